use log::{debug, error, info, warn};

use civic_ledger::*;
use snafu::{prelude::*, Snafu};

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;

use crate::ledger::config_reader::*;
use crate::ledger::io_common::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PipelineError {
    #[snafu(display("Input directory {path} does not exist or is not a directory"))]
    MissingInputDir { path: String },
    #[snafu(display("Error listing directory {path}"))]
    ReadingDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error creating directory {path}"))]
    CreatingDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading file {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing summaries to JSON"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("No parent directory for {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Error parsing ledger {path}"))]
    ParsingCore { source: LedgerError, path: String },
    #[snafu(display("Summary {path} differs from its reference"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// The outcome of a batch, by file name.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct BatchReport {
    pub processed: Vec<String>,
    pub failed: Vec<String>,
    /// Entries that are not `.txt` files.
    pub skipped: Vec<String>,
    /// Processed files whose JSON summary differs from the reference.
    pub mismatched: Vec<String>,
}

/// Processes every `.txt` file of the input directory, in file name order.
///
/// Only a missing input directory or an unusable output directory stop the
/// batch. The failure of one file is logged and the next file is processed.
pub fn process_directory(settings: &Settings) -> PipelineResult<BatchReport> {
    let input_dir = settings.input_dir.as_path();
    ensure!(
        input_dir.is_dir(),
        MissingInputDirSnafu {
            path: input_dir.display().to_string()
        }
    );
    info!(
        "Processing {} files in: {}",
        settings.dataset.name(),
        input_dir.display()
    );
    fs::create_dir_all(&settings.output_dir).context(CreatingDirSnafu {
        path: settings.output_dir.display().to_string(),
    })?;

    let mut report = BatchReport::default();
    for path in list_entries(input_dir)? {
        let name = simplify_file_name(&path);
        if !is_input_file(&path) {
            debug!("Skipping {}", name);
            report.skipped.push(name);
            continue;
        }
        info!("Processing file: {}", name);
        match process_file(&path, settings) {
            Ok(count) => {
                info!(
                    "Processed {}: found {} separate {}",
                    name,
                    count,
                    settings.dataset.unit()
                );
                report.processed.push(name);
            }
            Err(PipelineError::ReferenceMismatch { path }) => {
                warn!("Processed {}, but {} differs from its reference", name, path);
                report.processed.push(name.clone());
                report.mismatched.push(name);
            }
            Err(e) => {
                error!("Error while processing {}: {}", path.display(), e);
                if let Some(source) = std::error::Error::source(&e) {
                    error!("  caused by: {}", source);
                }
                report.failed.push(name);
            }
        }
    }

    if settings.combine {
        match io_json::combine_outputs(&settings.output_dir) {
            Ok(p) => info!("Created combined file: {}", p.display()),
            Err(e) => error!("Error while combining summaries: {}", e),
        }
    }
    Ok(report)
}

/// Summarizes one file and writes its outputs. Returns the number of summaries.
pub fn process_file(path: &Path, settings: &Settings) -> PipelineResult<usize> {
    let p = path.display().to_string();
    let bytes = fs::read(path).context(ReadingFileSnafu { path: p.clone() })?;
    let text = String::from_utf8_lossy(&bytes);
    if let Cow::Owned(_) = text {
        warn!(
            "{} is not valid UTF-8, invalid bytes were replaced with {:?}",
            p,
            char::REPLACEMENT_CHARACTER
        );
    }
    let (rows, warnings) = read_rows(&text).context(ParsingCoreSnafu { path: p.clone() })?;
    if !warnings.is_empty() {
        warn!("Parsing warnings for {}: {} rows", p, warnings.len());
    }
    debug!("process_file: {} rows in {}", rows.len(), p);

    match settings.dataset {
        Dataset::Contributions => {
            let summaries = summarize_contributions(&rows, &ContributionRules::DEFAULT_RULES);
            write_outputs(&summaries, path, settings)?;
            Ok(summaries.len())
        }
        Dataset::Elections => {
            let results = summarize_elections(&rows, &settings.election_rules);
            write_outputs(&results, path, settings)?;
            Ok(results.len())
        }
    }
}

fn write_outputs<T: serde::Serialize + io_csv::FlatRow>(
    summaries: &[T],
    input: &Path,
    settings: &Settings,
) -> PipelineResult<()> {
    let mut matches_reference = true;
    for ot in settings.output_types.iter() {
        let out = output_path(&settings.output_dir, input, ot.extension());
        match ot {
            OutputType::Json => {
                let js = io_json::write_json(summaries, &out)?;
                if let Some(reference_dir) = settings.reference_dir.as_deref() {
                    let reference = reference_dir.join(simplify_file_name(&out));
                    matches_reference = io_json::check_reference(&js, &reference)?;
                }
            }
            OutputType::Csv => io_csv::write_csv(summaries, &out)?,
        }
        info!("Created {} file: {}", ot.extension().to_uppercase(), out.display());
    }
    ensure!(
        matches_reference,
        ReferenceMismatchSnafu {
            path: output_path(&settings.output_dir, input, "json")
                .display()
                .to_string()
        }
    );
    Ok(())
}
