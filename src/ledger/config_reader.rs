use crate::args::Args;
use crate::ledger::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Dataset {
    Contributions,
    Elections,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Contributions => "contributions",
            Dataset::Elections => "elections",
        }
    }

    /// What one summary of this dataset stands for.
    pub fn unit(&self) -> &'static str {
        match self {
            Dataset::Contributions => "contributors",
            Dataset::Elections => "districts",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputType {
    Json,
    Csv,
}

impl OutputType {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputType::Json => "json",
            OutputType::Csv => "csv",
        }
    }
}

/// The content of a configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub dataset: Option<String>,
    #[serde(rename = "inputDirectory")]
    pub input_directory: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "outputTypes")]
    pub output_types: Option<Vec<String>>,
    #[serde(rename = "raceCode")]
    pub race_code: Option<String>,
    #[serde(rename = "tieBreakMode")]
    pub tie_break_mode: Option<String>,
    pub combine: Option<bool>,
    #[serde(rename = "referenceDirectory")]
    pub reference_directory: Option<String>,
}

/// Everything a batch needs, once the defaults, the configuration file and the
/// command line have been merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dataset: Dataset,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_types: Vec<OutputType>,
    pub election_rules: ElectionRules,
    pub combine: bool,
    pub reference_dir: Option<PathBuf>,
}

/// Reads a configuration file. Relative directories are resolved against the
/// directory of the file.
pub fn read_config(path: &str) -> PipelineResult<LedgerConfig> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    let mut config: LedgerConfig =
        serde_json::from_str(&contents).context(ParsingConfigSnafu { path })?;
    debug!("read_config: {:?}", config);

    let root = Path::new(path).parent().context(MissingParentDirSnafu { path })?;
    let resolve = |dir: Option<String>| dir.map(|d| root.join(d).display().to_string());
    config.input_directory = resolve(config.input_directory);
    config.output_directory = resolve(config.output_directory);
    config.reference_directory = resolve(config.reference_directory);
    Ok(config)
}

pub fn validate_dataset(s: &str) -> PipelineResult<Dataset> {
    match s {
        "contributions" => Ok(Dataset::Contributions),
        "elections" => Ok(Dataset::Elections),
        x => whatever!(
            "Unknown dataset {:?}: expected 'contributions' or 'elections'",
            x
        ),
    }
}

pub fn validate_output_types(types: &[String]) -> PipelineResult<Vec<OutputType>> {
    let mut res: Vec<OutputType> = Vec::new();
    for t in types.iter() {
        let ot = match t.as_str() {
            "json" => OutputType::Json,
            "csv" => OutputType::Csv,
            x => whatever!("Unknown output type {:?}: expected 'json' or 'csv'", x),
        };
        if !res.contains(&ot) {
            res.push(ot);
        }
    }
    if res.is_empty() {
        whatever!("At least one output type is required");
    }
    Ok(res)
}

pub fn validate_tie_break_mode(s: &str) -> PipelineResult<TieBreakMode> {
    match s {
        "alphabetical" => Ok(TieBreakMode::Alphabetical),
        "candidate-order" => Ok(TieBreakMode::CandidateOrder),
        x => whatever!(
            "Cannot use tie-break mode {:?}: expected 'alphabetical' or 'candidate-order'",
            x
        ),
    }
}

/// Merges the command line with the optional configuration file and the defaults.
pub fn resolve_settings(args: &Args) -> PipelineResult<Settings> {
    let config = match args.config.as_deref() {
        Some(p) => read_config(p)?,
        None => LedgerConfig::default(),
    };

    let dataset = validate_dataset(
        args.dataset
            .as_deref()
            .or(config.dataset.as_deref())
            .unwrap_or("contributions"),
    )?;

    let input_dir: PathBuf = args
        .input
        .clone()
        .or(config.input_directory)
        .map(PathBuf::from)
        .unwrap_or_else(|| ["storage", dataset.name(), "downloads"].iter().collect());
    let output_dir: PathBuf = args
        .out
        .clone()
        .or(config.output_directory)
        .map(PathBuf::from)
        .unwrap_or_else(|| ["storage", dataset.name(), "processed"].iter().collect());

    let output_types = validate_output_types(
        &args
            .output_type
            .clone()
            .or(config.output_types)
            .unwrap_or_else(|| vec!["json".to_string()]),
    )?;

    let tie_break_mode = validate_tie_break_mode(
        args.tie_break
            .as_deref()
            .or(config.tie_break_mode.as_deref())
            .unwrap_or("alphabetical"),
    )?;
    let race_code = args
        .race_code
        .as_deref()
        .or(config.race_code.as_deref())
        .unwrap_or(DEFAULT_RACE_CODE);

    let combine = args.combine || config.combine.unwrap_or(false);
    if combine && dataset != Dataset::Contributions {
        warn!("The combine option only applies to contributions, ignoring it");
    }

    let settings = Settings {
        dataset,
        input_dir,
        output_dir,
        output_types,
        election_rules: ElectionRules::new(race_code, tie_break_mode),
        combine: combine && dataset == Dataset::Contributions,
        reference_dir: args
            .reference
            .clone()
            .or(config.reference_directory)
            .map(PathBuf::from),
    };
    info!("settings: {:?}", settings);
    Ok(settings)
}
