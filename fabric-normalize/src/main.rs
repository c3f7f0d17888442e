use anyhow::{Context, Result};
use clap::Parser;
use fabric_normalize::config::{load_config, RunConfig};
use tracing_subscriber::EnvFilter;

mod cli;
mod normalize_cmd;
mod path_guard;
mod rules_cmd;
mod validate_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load run config {}", path.display()))?,
        None => RunConfig::default(),
    };

    match cli.command {
        Command::Normalize(args) => normalize_cmd::run_normalize(args, &config),
        Command::Validate(args) => validate_cmd::run_validate(args, &config),
        Command::Rules(args) => rules_cmd::run_rules(args, &config),
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `-v`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
