mod args;
mod ledger;

use clap::Parser;
use log::{info, warn};
use snafu::ErrorCompat;
use std::error::Error;

use crate::ledger::config_reader::resolve_settings;
use crate::ledger::process_directory;

fn main() {
    let args = args::Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let res = resolve_settings(&args).and_then(|settings| process_directory(&settings));

    match res {
        Ok(report) => {
            info!(
                "Done: {} processed, {} failed, {} skipped",
                report.processed.len(),
                report.failed.len(),
                report.skipped.len()
            );
            for name in report.failed.iter() {
                warn!("Failed to process {}", name);
            }
            if !report.mismatched.is_empty() {
                warn!(
                    "{} summaries differ from their reference: {:?}",
                    report.mismatched.len(),
                    report.mismatched
                );
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("An error occured: {}", e);
            let mut source = e.source();
            while let Some(s) = source {
                eprintln!("  caused by: {}", s);
                source = s.source();
            }
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    }
}
