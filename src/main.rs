//! Command-line interface for scalar-datagen
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate the row count declared in the config
//! scalar-datagen generate --config dataset.yaml --output dataset.csv
//!
//! # Override rows and seed, and keep the column statistics
//! scalar-datagen generate --config dataset.yaml --output dataset.csv \
//!   --rows 1000000 --seed 7 --summary stats.json
//!
//! # Validate field configurations and resolve dictionaries
//! scalar-datagen validate --config dataset.yaml
//! ```
//!
//! Logging is controlled through `RUST_LOG`, e.g. `RUST_LOG=info`.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use datagen_core::DataConfig;
use datagen_dictionary::DictionaryRegistry;
use datagen_generator::{validate_config, DatasetGenerator};
use scalar_datagen::{summarize, CsvExporter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "scalar-datagen")]
#[command(about = "Generate synthetic column data from a YAML dataset description")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset and write it as CSV
    Generate {
        /// Dataset configuration (YAML)
        #[arg(long, short = 'c', env = "DATAGEN_CONFIG")]
        config: PathBuf,

        /// Number of rows (defaults to the config's `rows`)
        #[arg(long)]
        rows: Option<usize>,

        /// Seed override (defaults to the config's `seed`)
        #[arg(long)]
        seed: Option<u64>,

        /// Output CSV file
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Also write per-column statistics as JSON
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Omit the CSV header row
        #[arg(long)]
        no_header: bool,
    },

    /// Validate every field configuration
    Validate {
        /// Dataset configuration (YAML)
        #[arg(long, short = 'c', env = "DATAGEN_CONFIG")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            rows,
            seed,
            output,
            summary,
            no_header,
        } => run_generate(&config, rows, seed, &output, summary.as_deref(), no_header),
        Commands::Validate { config } => run_validate(&config),
    }
}

fn load_config(path: &Path) -> anyhow::Result<DataConfig> {
    DataConfig::from_file(path).with_context(|| format!("Failed to load config from {path:?}"))
}

/// Directory relative dictionary and corpus paths are resolved against.
fn base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn run_generate(
    config_path: &Path,
    rows: Option<usize>,
    seed: Option<u64>,
    output: &Path,
    summary_path: Option<&Path>,
    no_header: bool,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let registry = DictionaryRegistry::with_builtins();
    let mut generator = DatasetGenerator::new(&config, &registry, &base_dir(config_path))
        .context("Failed to build generators")?;

    let rows = rows.unwrap_or_else(|| generator.default_rows());
    let set = generator
        .generate(rows)
        .context("Failed to generate dataset")?;

    let report = CsvExporter::new()
        .with_header(!no_header)
        .export(&set, output)
        .with_context(|| format!("Failed to write {output:?}"))?;

    let summaries = summarize(&set);
    for summary in &summaries {
        tracing::info!("Column stats: {}", serde_json::to_string(summary)?);
    }
    if let Some(path) = summary_path {
        let json = serde_json::to_string_pretty(&summaries)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {path:?}"))?;
    }

    tracing::info!(
        "Wrote {} rows x {} columns to {} in {:?} ({:.0} rows/s, {} null cells, {} bytes)",
        report.rows,
        report.columns,
        output.display(),
        report.elapsed,
        report.rows_per_second(),
        report.null_cells,
        report.bytes
    );
    Ok(())
}

fn run_validate(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut failures = 0;
    for field in &config.fields {
        match validate_config(field) {
            Ok(()) => println!("ok      {} ({})", field.name, field.generator.kind()),
            Err(e) => {
                failures += 1;
                println!("invalid {}: {e}", field.name);
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} fields are invalid", config.fields.len());
    }

    // Resolves dictionaries and corpus files as generation would
    let registry = DictionaryRegistry::with_builtins();
    DatasetGenerator::new(&config, &registry, &base_dir(config_path))
        .context("Failed to resolve dataset resources")?;

    println!("{} fields valid", config.fields.len());
    Ok(())
}
