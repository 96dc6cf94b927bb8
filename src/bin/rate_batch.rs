//! Rate every query/URL pair in a JSON file and write a CSV report.
//!
//! ```text
//! rate_batch --input samples.json --output results.csv
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use url_validator::batch::{read_requests, run_batch, write_csv_file};
use url_validator::metrics::Metrics;
use url_validator::telemetry::init_tracing;
use url_validator::{UrlValidator, ValidatorConfig};

#[derive(Debug, Parser)]
#[command(name = "rate_batch", version, about = "Batch-rate URLs into a CSV report")]
struct Args {
    /// JSON array of {"query": .., "url": ..} objects.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// CSV destination.
    #[arg(long, value_name = "FILE", default_value = "results.csv")]
    output: PathBuf,

    /// Config file (TOML). Defaults to $URL_VALIDATOR_CONFIG or config/validator.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr when done.
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();

    let metrics = if args.metrics {
        Some(Metrics::init()?)
    } else {
        None
    };

    let cfg = match &args.config {
        Some(path) => ValidatorConfig::load_from_path(path)?,
        None => ValidatorConfig::load()?,
    };
    let validator = UrlValidator::from_config(&cfg)?;

    let requests = read_requests(&args.input)?;
    let rows = run_batch(&validator, &requests).await;
    write_csv_file(&args.output, &rows)?;
    info!(target: "batch", output = %args.output.display(), rows = rows.len(), "report written");

    if let Some(m) = metrics {
        eprintln!("{}", m.render());
    }
    Ok(())
}
