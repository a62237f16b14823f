//! Extract command - run rule groups against a single document.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use fieldex_core::CompiledRules;

use super::config::load_config;
use super::sources::RuleSources;
use crate::output::{OutputFormat, format_batch};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    #[command(flatten)]
    sources: RuleSources,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let groups = args.sources.load()?;
    let rules = CompiledRules::compile_with(&groups, &config.extraction)?;

    let document = read_document(args.input.as_ref())?;
    info!(
        "Extracting {} rule groups from {} bytes",
        rules.len(),
        document.len()
    );

    let batch = rules.apply(&document);
    let output = format_batch(&batch, args.format, &config.output)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    info!("Done in {}ms", start.elapsed().as_millis());

    Ok(())
}

fn read_document(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            info!("Reading {}", path.display());
            Ok(fs::read_to_string(path)?)
        }
        _ => {
            let mut document = String::new();
            std::io::stdin().read_to_string(&mut document)?;
            Ok(document)
        }
    }
}
