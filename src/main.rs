//! url-validator: rate one URL's credibility for a query and print the result as JSON.
//!
//! ```text
//! url-validator "Is electric vehicle adoption increasing?" \
//!     https://www.iea.org/reports/global-ev-outlook-2023 --pretty
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use url_validator::telemetry::init_tracing;
use url_validator::{UrlValidator, ValidatorConfig};

#[derive(Debug, Parser)]
#[command(name = "url-validator", version, about = "Rate the credibility of a URL for a query")]
struct Cli {
    /// The question the page should answer.
    query: String,

    /// Page to fetch and rate.
    url: String,

    /// Config file (TOML). Defaults to $URL_VALIDATOR_CONFIG or config/validator.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON result.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => ValidatorConfig::load_from_path(path)?,
        None => ValidatorConfig::load()?,
    };
    let validator = UrlValidator::from_config(&cfg)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(target: "cli", "interrupted, cancelling evaluation");
            on_signal.cancel();
        }
    });

    let result = validator
        .evaluate_cancellable(&cli.query, &cli.url, &cancel)
        .await;

    let out = if cli.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("serializing evaluation result")?;
    println!("{out}");
    Ok(())
}
