//! Rule group sources shared by the extract, batch, and check commands.

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use fieldex_core::{RuleGroup, load_rules, presets};

/// Where rule groups come from. Groups are taken in order: rule file, presets,
/// then one group built from inline rules.
#[derive(Args, Debug)]
pub struct RuleSources {
    /// JSON rule file (an object of field patterns, or an array of them)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Built-in preset group (repeatable)
    #[arg(short, long = "preset")]
    presets: Vec<String>,

    /// Inline field rule as NAME=PATTERN (repeatable, forms one group)
    #[arg(short = 'e', long = "rule", value_parser = parse_inline_rule)]
    inline: Vec<(String, String)>,
}

impl RuleSources {
    pub fn load(&self) -> anyhow::Result<Vec<RuleGroup>> {
        let mut groups = Vec::new();

        if let Some(path) = &self.rules {
            if !path.exists() {
                anyhow::bail!("Rule file not found: {}", path.display());
            }
            let loaded = load_rules(path)?;
            debug!("Loaded {} rule groups from {}", loaded.len(), path.display());
            groups.extend(loaded);
        }

        for name in &self.presets {
            let group = presets::get(name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown preset: {} (available: {})",
                    name,
                    presets::names().collect::<Vec<_>>().join(", ")
                )
            })?;
            groups.push(group);
        }

        if !self.inline.is_empty() {
            groups.push(self.inline.iter().cloned().collect());
        }

        if groups.is_empty() {
            anyhow::bail!("No rules given. Use --rules, --preset, or --rule NAME=PATTERN.");
        }

        Ok(groups)
    }
}

fn parse_inline_rule(s: &str) -> Result<(String, String), String> {
    let (name, pattern) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATTERN, got '{s}'"))?;

    if name.is_empty() {
        return Err("field name must not be empty".to_string());
    }

    Ok((name.to_string(), pattern.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline_rule_splits_on_first_equals() {
        assert_eq!(
            parse_inline_rule(r"id=id=(\d+)"),
            Ok(("id".to_string(), r"id=(\d+)".to_string()))
        );
        assert!(parse_inline_rule("novalue").is_err());
        assert!(parse_inline_rule("=x").is_err());
    }
}
