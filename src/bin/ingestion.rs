//! Ingestion entry point.
//!
//! Invoked once per submission by the hosting platform:
//!
//! ```text
//! ingestion --input-dir bundle/input_data --output-dir run/output \
//!           --config competition.json --submission nearest_centroid
//! ```
//!
//! Trains the submission on the training split and writes one prediction
//! artifact per evaluation split. Any failure is fatal and leaves no
//! partial artifacts.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use podium::config::CompetitionConfig;
use podium::ingestion::IngestionRunner;
use podium::model;

#[derive(Debug, Parser)]
#[command(name = "ingestion", about = "Train a submission and write prediction artifacts")]
struct Cli {
    /// Directory holding the input splits (train/, test/, ...).
    #[arg(long, value_name = "DIR")]
    input_dir: PathBuf,

    /// Directory to write prediction artifacts into.
    #[arg(long, value_name = "DIR")]
    output_dir: PathBuf,

    /// Competition configuration file (JSON); defaults apply when absent.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Builtin submission to evaluate.
    #[arg(long, value_name = "NAME", default_value = "majority_class")]
    submission: String,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CompetitionConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => CompetitionConfig::default(),
    };

    let submission = model::builtin(&cli.submission)?;

    let summary = IngestionRunner::new(&config)
        .run(&cli.input_dir, &cli.output_dir, &submission)
        .context("ingestion failed")?;

    info!(
        train_rows = summary.train_rows,
        splits = summary.splits.len(),
        "ingestion complete"
    );
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
