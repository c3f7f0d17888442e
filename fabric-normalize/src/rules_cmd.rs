use anyhow::Result;
use fabric_normalize::config::RunConfig;
use fabric_normalize::report::{render_rule_list, RuleListing};
use fabric_normalize::RuleEngine;

use crate::cli::{OutputFormat, RulesArgs};

pub fn run_rules(args: RulesArgs, config: &RunConfig) -> Result<()> {
    let mut engine = RuleEngine::registered();
    if let Some(fabric_type) = args.fabric_type {
        engine = engine.for_fabric(fabric_type);
    }
    let (engine, _) = engine.without(config.rules.disabled.as_slice());

    match args.format {
        OutputFormat::Text => println!("{}", render_rule_list(engine.rules())),
        OutputFormat::Json => {
            let listing: Vec<RuleListing> = engine.rules().iter().map(|rule| (*rule).into()).collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(())
}
