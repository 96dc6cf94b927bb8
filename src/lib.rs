// src/lib.rs
//! URL credibility validator.
//!
//! Fetches a page, scores it on domain trust, relevance to a query,
//! fact-checking and bias, and turns the weighted total into a 1-5 star
//! rating with a short explanation.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use url_validator::{UrlValidator, ValidatorConfig};
//!
//! let validator = UrlValidator::from_config(&ValidatorConfig::load()?)?;
//! let result = validator
//!     .evaluate("Is electric vehicle adoption increasing?", "https://www.iea.org/reports/global-ev-outlook-2023")
//!     .await;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod analyze;
pub mod batch;
pub mod config;
pub mod evaluation;
pub mod fetch;
pub mod metrics;
pub mod sentiment;
pub mod similarity;
pub mod telemetry;
pub mod validator;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{Evaluators, ScoreScale, ScoreWeights, StandardEvaluators, SubScores};
pub use crate::config::ValidatorConfig;
pub use crate::evaluation::{EvaluationRequest, EvaluationResult, RawScores};
pub use crate::fetch::{ContentFetcher, FetchError, FetchResult, HttpFetcher, PageContent};
pub use crate::validator::UrlValidator;
