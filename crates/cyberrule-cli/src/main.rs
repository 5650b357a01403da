//! CyberRule CLI - Command-line interface
//!
//! Usage:
//!   cyberrule extract --input <records.json> [--output <file>] [--max N] [--sequential]
//!   cyberrule sample [--description <text>]
//!   cyberrule stats

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cyberrule_core::{AppConfig, LoggingConfig};
use cyberrule_extractor::batch::{load_records, write_results};
use cyberrule_extractor::{BatchProcessor, ExtractionEngine};

const SAMPLE_DESCRIPTION: &str = "SQL injection vulnerability in Apache Tomcat 8.5 allows \
     remote attackers to execute arbitrary code via the admin panel";

#[derive(Parser)]
#[command(name = "cyberrule")]
#[command(about = "Rule-based extraction of ontology facts from CVE descriptions")]
#[command(version)]
struct Cli {
    /// TOML configuration file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a batch of CVE records
    Extract {
        /// JSON array of records with `id` and `description`
        #[arg(long)]
        input: PathBuf,
        /// Where to write the enriched records
        #[arg(long, default_value = "output/extraction_results.json")]
        output: PathBuf,
        /// Maximum number of records to process
        #[arg(long)]
        max: Option<usize>,
        /// Process records on a single thread
        #[arg(long)]
        sequential: bool,
    },
    /// Extract a single description and print the result
    Sample {
        #[arg(long)]
        description: Option<String>,
    },
    /// Print pattern statistics
    Stats,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    if logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging);

    let engine = ExtractionEngine::from_config(&config)?;

    match cli.command {
        Commands::Extract {
            input,
            output,
            max,
            sequential,
        } => {
            if let Some(max) = max {
                config.batch.max_records = max;
            }
            if sequential {
                config.batch.parallel = false;
            }

            let records = load_records(&input)
                .with_context(|| format!("loading records from {}", input.display()))?;
            info!(
                records = records.len(),
                max_records = config.batch.max_records,
                parallel = config.batch.parallel,
                "Starting extraction"
            );

            let started = Instant::now();
            let batch = BatchProcessor::new(&engine, config.batch.clone()).run(&records);
            write_results(&output, &batch.records)?;

            let summary = &batch.summary;
            info!(
                output = %output.display(),
                records = summary.total_records,
                with_extractions = summary.records_with_extractions,
                failed = summary.failed_records,
                avg_classes = summary.avg_classes_per_record(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Extraction finished"
            );
        }
        Commands::Sample { description } => {
            let description = description.as_deref().unwrap_or(SAMPLE_DESCRIPTION);
            let result = engine.extract("CVE-SAMPLE", description)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&engine.statistics())?);
        }
    }

    Ok(())
}
