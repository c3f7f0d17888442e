use anyhow::{bail, Context, Result};
use fabric_normalize::config::RunConfig;
use fabric_normalize::report::{render_failure, render_notices, render_rule_report, ValidateReport};
use fabric_normalize::{Pipeline, RuleEngine, Severity};
use fabric_tree::parse_file;
use tracing::warn;

use crate::cli::{OutputFormat, ValidateArgs};

pub fn run_validate(args: ValidateArgs, config: &RunConfig) -> Result<()> {
    let raw = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let strict = args.strict || config.strict;
    let templates = config.templates();

    let outcome = match Pipeline::standard().run(&raw, templates.as_ref()) {
        Ok(outcome) => outcome,
        Err(err) => {
            match args.format {
                OutputFormat::Text => println!("{}", render_failure(&err)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&ValidateReport::failed(&err))?)
                }
            }
            bail!("validate failed: normalization did not complete");
        }
    };

    let (engine, unknown) = RuleEngine::registered()
        .for_fabric(outcome.model.fabric_type)
        .without(config.rules.disabled.as_slice());
    for id in unknown {
        warn!(rule = %id, "disabled rule is not registered for this fabric type");
    }
    let report = engine.evaluate(&outcome.model);

    match args.format {
        OutputFormat::Text => {
            if !outcome.notices.is_empty() {
                println!("{}", render_notices(&outcome.notices));
            }
            println!("{}", render_rule_report(&report, strict));
        }
        OutputFormat::Json => {
            let json = ValidateReport::checked(&report, &outcome.notices, strict);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    let errors = report.count(Severity::Error);
    if errors > 0 {
        bail!("validate failed: {errors} errors");
    }
    if !report.passes(strict) {
        bail!(
            "validate failed in strict mode: {} warnings",
            report.count(Severity::Warning)
        );
    }
    Ok(())
}
