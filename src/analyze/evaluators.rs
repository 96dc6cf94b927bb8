//! The swappable evaluator set used by the validator.
//!
//! [`StandardEvaluators`] runs the four evaluators from [`super::subscores`]
//! over whichever inference capabilities it was built with. Tests and callers
//! that want known sub-scores plug in another [`Evaluators`] implementation
//! (see [`super::mock::FixedEvaluators`]) without touching the validator.

use async_trait::async_trait;

use super::models::{build_models, DynSentiment, DynSimilarity};
use super::scoring::{ScoreScale, SubScores};
use super::subscores;
use crate::config::ValidatorConfig;
use crate::fetch::FetchResult;

#[async_trait]
pub trait Evaluators: Send + Sync {
    /// All four sub-scores on the aggregator's scale.
    /// Implementations return `SubScores::default()` for a failed fetch.
    async fn evaluate(&self, query: &str, url: &str, page: &FetchResult) -> SubScores;

    /// Name for diagnostics.
    fn name(&self) -> &'static str;
}

pub struct StandardEvaluators {
    similarity: DynSimilarity,
    sentiment: DynSentiment,
    scale: ScoreScale,
    sentiment_max_chars: usize,
}

impl StandardEvaluators {
    pub fn new(
        similarity: DynSimilarity,
        sentiment: DynSentiment,
        scale: ScoreScale,
        sentiment_max_chars: usize,
    ) -> Self {
        Self {
            similarity,
            sentiment,
            scale,
            sentiment_max_chars,
        }
    }

    pub fn from_config(cfg: &ValidatorConfig) -> anyhow::Result<Self> {
        let (similarity, sentiment) = build_models(&cfg.models)?;
        Ok(Self::new(
            similarity,
            sentiment,
            cfg.scoring.scale,
            cfg.scoring.sentiment_max_chars,
        ))
    }

    pub fn scale(&self) -> ScoreScale {
        self.scale
    }
}

#[async_trait]
impl Evaluators for StandardEvaluators {
    async fn evaluate(&self, query: &str, url: &str, page: &FetchResult) -> SubScores {
        if page.is_err() {
            return SubScores::default();
        }

        // The two model-backed evaluators are independent; run them together.
        let (relevance, bias) = tokio::join!(
            subscores::relevance(self.similarity.as_ref(), query, page),
            subscores::bias(self.sentiment.as_ref(), page, self.sentiment_max_chars),
        );

        SubScores {
            domain_trust: self.scale.placeholder(subscores::domain_trust(url, page)),
            relevance,
            fact_check: self.scale.placeholder(subscores::fact_check(page)),
            bias,
        }
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}
