use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fabric_normalize::FabricType;

#[derive(Parser, Debug)]
#[command(name = "fabric-normalize")]
#[command(about = "Normalize and validate data-center fabric configuration documents")]
pub struct Cli {
    /// TOML run configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log pipeline and rule activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Run the normalization pipeline and print the canonical model.
    Normalize(NormalizeArgs),
    /// Normalize, then evaluate every applicable rule.
    Validate(ValidateArgs),
    /// List registered rules.
    Rules(RulesArgs),
}

#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = DocumentFormatArg::Yaml)]
    pub format: DocumentFormatArg,
    /// Write the canonical model here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Print what normalization changed instead of the model.
    #[arg(long)]
    pub changes: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Fail on warning-severity violations too.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct RulesArgs {
    /// Only list rules for this configuration type.
    #[arg(long)]
    pub fabric_type: Option<FabricType>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DocumentFormatArg {
    Yaml,
    Json,
}
