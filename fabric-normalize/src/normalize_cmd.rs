use std::fs;

use anyhow::{Context, Result};
use fabric_normalize::config::RunConfig;
use fabric_normalize::report::render_changes;
use fabric_normalize::Pipeline;
use fabric_tree::{diff, parse_file, write, DocumentFormat};
use tracing::info;

use crate::cli::{DocumentFormatArg, NormalizeArgs};
use crate::path_guard;

pub fn run_normalize(args: NormalizeArgs, config: &RunConfig) -> Result<()> {
    let raw = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let templates = config.templates();
    let outcome = Pipeline::standard()
        .run(&raw, templates.as_ref())
        .with_context(|| format!("failed to normalize {}", args.file.display()))?;
    info!(
        fabric = %outcome.model.fabric_name,
        fabric_type = %outcome.model.fabric_type,
        notices = outcome.notices.len(),
        "normalized"
    );

    if args.changes {
        println!("{}", render_changes(&diff(&raw, &outcome.model.tree)));
        return Ok(());
    }

    let format = match args.format {
        DocumentFormatArg::Yaml => DocumentFormat::Yaml,
        DocumentFormatArg::Json => DocumentFormat::Json,
    };
    let text = write(&outcome.model.tree, format).context("failed to serialize canonical model")?;

    match args.output {
        Some(out_path) => {
            path_guard::ensure_output_not_input(&out_path, &args.file)?;
            fs::write(&out_path, text)
                .with_context(|| format!("failed to write output {}", out_path.display()))?;
        }
        None => print!("{text}"),
    }
    Ok(())
}
