//! Scoring entry point.
//!
//! Invoked after ingestion has completed:
//!
//! ```text
//! scoring --predictions-dir run/output --reference-dir bundle/reference_data \
//!         --output-dir run/scores --config competition.json
//! ```
//!
//! Compares prediction artifacts against withheld ground truth and writes
//! `scores.json`. Per-split failures are captured into the report; the
//! process only exits nonzero when no report could be produced at all.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use podium::config::CompetitionConfig;
use podium::scoring::ScoringRunner;

#[derive(Debug, Parser)]
#[command(name = "scoring", about = "Score prediction artifacts against ground truth")]
struct Cli {
    /// Directory holding the prediction artifacts from ingestion.
    #[arg(long, value_name = "DIR")]
    predictions_dir: PathBuf,

    /// Directory holding the withheld ground-truth label files.
    #[arg(long, value_name = "DIR")]
    reference_dir: PathBuf,

    /// Directory to write scores.json into.
    #[arg(long, value_name = "DIR")]
    output_dir: PathBuf,

    /// Competition configuration file (JSON); defaults apply when absent.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CompetitionConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => CompetitionConfig::default(),
    };

    let report = ScoringRunner::new(&config)
        .run(&cli.predictions_dir, &cli.reference_dir, &cli.output_dir)
        .context("scoring failed")?;

    if report.is_clean() {
        info!("scoring complete");
    } else {
        warn!("scoring complete with captured failures");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
