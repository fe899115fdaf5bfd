use clap::Parser;

/// This is a lottery program that allocates contested projects among players.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, default votes.yaml) The file containing the votes of the players.
    /// The SHA-256 hash of this file seeds the lottery.
    #[clap(short, long, value_parser, default_value = "votes.yaml")]
    pub input: String,

    /// (yaml, json, csv or xlsx) The type of the input. If not provided, it is
    /// inferred from the extension of the input file, and defaults to yaml.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, optional) A YAML or JSON file with a `Configs` section. It is required for
    /// csv and xlsx inputs and overrides the `Configs` section of the input file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the lottery will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the outcome of a lottery in JSON format. If provided, quadlot will
    /// check that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
