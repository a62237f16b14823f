//! Batch processing command for multiple text files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::{StreamExt, stream};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use fieldex_core::{CompiledRules, ExtractionBatch};

use super::config::load_config;
use super::sources::RuleSources;
use crate::output::{OutputFormat, format_batch};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files as a glob pattern
    #[arg(required = true)]
    input: String,

    #[command(flatten)]
    sources: RuleSources,

    /// Output directory (default: print to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    batch: Option<ExtractionBatch>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let groups = args.sources.load()?;
    let rules = Arc::new(CompiledRules::compile_with(&groups, &config.extraction)?);

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Extraction is CPU-bound; fan out on blocking workers, keep input order
    let mut outcomes = stream::iter(files)
        .map(|path| {
            let rules = Arc::clone(&rules);
            tokio::task::spawn_blocking(move || process_file(path, &rules))
        })
        .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some(joined) = outcomes.next().await {
        let result = joined?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        pb.inc(1);
        results.push(result);
    }

    pb.finish_and_clear();

    let mut used_names = HashSet::new();
    for result in &results {
        if let Some(batch) = &result.batch {
            write_output(result, batch, &args, &config.output, &mut used_names)?;
        }
    }

    if args.summary {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("summary_{}.csv", timestamp));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    if failed > 0 {
        eprintln!("{} {} files failed", style("✗").red(), failed);
    }

    Ok(())
}

fn process_file(path: PathBuf, rules: &CompiledRules) -> ProcessResult {
    let file_start = Instant::now();

    let (batch, error) = match fs::read_to_string(&path) {
        Ok(document) => (Some(rules.apply(&document)), None),
        Err(e) => (None, Some(e.to_string())),
    };

    ProcessResult {
        path,
        batch,
        error,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn write_output(
    result: &ProcessResult,
    batch: &ExtractionBatch,
    args: &BatchArgs,
    config: &fieldex_core::OutputConfig,
    used_names: &mut HashSet<String>,
) -> anyhow::Result<()> {
    let content = format_batch(batch, args.format, config)?;

    match &args.output_dir {
        Some(output_dir) => {
            let output_name = output_file_name(&result.path, args.format.extension(), used_names);
            let output_path = output_dir.join(&output_name);

            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
        None => {
            println!("==> {} <==", result.path.display());
            println!("{}", content.trim_end());
        }
    }

    Ok(())
}

/// Output file name for an input: the full file name plus the format extension,
/// so `a.txt` and `a.md` stay apart. Names already taken in this run get a
/// numeric suffix.
fn output_file_name(path: &Path, extension: &str, used_names: &mut HashSet<String>) -> String {
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document");

    let mut name = format!("{}.{}", base, extension);
    let mut n = 1;
    while used_names.contains(&name) {
        name = format!("{}.{}.{}", base, n, extension);
        n += 1;
    }

    if n > 1 {
        warn!(
            "Output for {} already taken, writing {} instead",
            path.display(),
            name
        );
    }

    used_names.insert(name.clone());
    name
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "records",
        "matched_fields",
        "total_fields",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let elapsed = result.processing_time_ms.to_string();

        let record = match &result.batch {
            Some(batch) => {
                let matched: usize = batch.iter().map(|r| r.matched_count()).sum();
                let total: usize = batch.iter().map(|r| r.len()).sum();
                vec![
                    filename,
                    "success".to_string(),
                    batch.len().to_string(),
                    matched.to_string(),
                    total.to_string(),
                    elapsed,
                    String::new(),
                ]
            }
            None => vec![
                filename,
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                elapsed,
                result.error.clone().unwrap_or_default(),
            ],
        };

        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
