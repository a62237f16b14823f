//! Presets command - list or show built-in rule groups.

use clap::Args;

use fieldex_core::presets;

/// Arguments for the presets command.
#[derive(Args)]
pub struct PresetsArgs {
    /// Preset to print as a rule file
    name: Option<String>,
}

pub async fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.name {
        Some(name) => {
            let group = presets::get(&name)
                .ok_or_else(|| anyhow::anyhow!("Unknown preset: {}", name))?;
            println!("{}", serde_json::to_string_pretty(&group)?);
        }
        None => {
            for name in presets::names() {
                let fields: Vec<String> = presets::get(name)
                    .map(|group| group.iter().map(|f| f.name.clone()).collect())
                    .unwrap_or_default();
                println!("{:<10} {}", name, fields.join(", "));
            }
        }
    }

    Ok(())
}
