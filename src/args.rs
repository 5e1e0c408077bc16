use clap::Parser;

/// Summarizes campaign-finance and election-results exports.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. The command line options take precedence over
    /// the values it contains. Relative directories in the file are read from the file's own directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (default contributions) The kind of files to process: 'contributions' or 'elections'.
    #[clap(short, long, value_parser)]
    pub dataset: Option<String>,

    /// (directory path) The directory containing the .txt exports.
    /// Defaults to storage/<dataset>/downloads.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (directory path) The directory where the summaries are written. It is created if needed.
    /// Defaults to storage/<dataset>/processed.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default json) The output formats: 'json', 'csv'. May be repeated.
    #[clap(long, value_parser)]
    pub output_type: Option<Vec<String>>,

    /// (default STS) For elections, the race code of the races to tabulate.
    #[clap(long, value_parser)]
    pub race_code: Option<String>,

    /// (default alphabetical) For elections, how to pick a winner among candidates with the same
    /// number of votes: 'alphabetical' or 'candidate-order'.
    #[clap(long, value_parser)]
    pub tie_break: Option<String>,

    /// If passed as an argument, the JSON summaries of a contributions run are also gathered into
    /// a single combined.json file.
    #[clap(long, takes_value = false)]
    pub combine: bool,

    /// (directory path) A directory of reference JSON summaries. If provided, every JSON summary is
    /// checked against the file of the same name in this directory.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
