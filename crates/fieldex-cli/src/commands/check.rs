//! Check command - compile rules and report their shape.

use clap::Args;
use console::style;

use fieldex_core::CompiledRules;

use super::config::load_config;
use super::sources::RuleSources;

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    sources: RuleSources,
}

pub async fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let groups = args.sources.load()?;
    let rules = CompiledRules::compile_with(&groups, &config.extraction)?;

    for index in 0..rules.len() {
        let fields = rules.group(index).unwrap_or_default();
        println!("Group {} ({} fields)", index, fields.len());

        for field in fields {
            let shape = match field.arity() {
                0 => "whole match".to_string(),
                1 => "1 group".to_string(),
                n => format!("{} groups (tuple)", n),
            };
            println!("  {:<16} {:<18} {}", field.name(), shape, field.pattern());
        }
    }

    println!(
        "{} {} rule groups compiled",
        style("✓").green(),
        rules.len()
    );

    Ok(())
}
