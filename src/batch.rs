// src/batch.rs
//! Batch rating: evaluate a list of query/URL pairs and write a CSV report.
//!
//! Columns: `user_prompt,url_to_check,func_rating,custom_rating`.
//! `func_rating` is the star count (0 for a validation error) and
//! `custom_rating` bumps it by one star, capped at 5.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analyze::rating::MAX_STARS;
use crate::evaluation::EvaluationRequest;
use crate::telemetry::anon_hash;
use crate::validator::UrlValidator;

pub const CSV_HEADER: &str = "user_prompt,url_to_check,func_rating,custom_rating";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub user_prompt: String,
    pub url_to_check: String,
    pub func_rating: u8,
    pub custom_rating: u8,
}

impl BatchRow {
    pub fn new(req: &EvaluationRequest, func_rating: u8) -> Self {
        Self {
            user_prompt: req.query.clone(),
            url_to_check: req.url.clone(),
            func_rating,
            custom_rating: custom_rating(func_rating),
        }
    }
}

/// One star more, never above the maximum.
pub fn custom_rating(func_rating: u8) -> u8 {
    if func_rating < MAX_STARS {
        func_rating + 1
    } else {
        func_rating
    }
}

/// Read `[{"query": .., "url": ..}, ..]` (legacy `user_prompt` / `url_to_check`
/// keys are accepted as well).
pub fn read_requests(path: &Path) -> Result<Vec<EvaluationRequest>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading batch input {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing batch input {}", path.display()))
}

/// Evaluate every request in order. A validation error yields a row with
/// `func_rating = 0`; the batch itself never stops on one.
pub async fn run_batch(validator: &UrlValidator, requests: &[EvaluationRequest]) -> Vec<BatchRow> {
    let mut rows = Vec::with_capacity(requests.len());
    for req in requests {
        let result = validator.evaluate_request(req).await;
        if let Some(msg) = result.error_message() {
            warn!(target: "batch", url_id = %anon_hash(&req.url), error = msg, "row not rated");
        }
        rows.push(BatchRow::new(req, result.stars()));
    }
    info!(target: "batch", rows = rows.len(), "batch finished");
    rows
}

/// RFC 4180 quoting: only fields containing a comma, quote or line break are quoted.
fn csv_field(s: &str) -> String {
    if s.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn write_csv<W: Write>(mut out: W, rows: &[BatchRow]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for r in rows {
        writeln!(
            out,
            "{},{},{},{}",
            csv_field(&r.user_prompt),
            csv_field(&r.url_to_check),
            r.func_rating,
            r.custom_rating
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, rows: &[BatchRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating batch output {}", path.display()))?;
    write_csv(std::io::BufWriter::new(file), rows)
        .with_context(|| format!("writing batch output {}", path.display()))
}
