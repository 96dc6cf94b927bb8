// src/validator.rs
//! The facade: fetch → sub-scores → weighted total → stars + explanation.
//!
//! A failed fetch is terminal. The evaluator set, aggregator, rating and
//! explanation only run for a page that was fetched and had readable text.

use std::sync::Arc;

use anyhow::Context;
use metrics::{counter, histogram};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::analyze::evaluators::{Evaluators, StandardEvaluators};
use crate::analyze::explain::explain;
use crate::analyze::rating::to_stars;
use crate::analyze::scoring::{aggregate, SubScores};
use crate::analyze::weights::{HotReloadWeights, WeightsSource};
use crate::config::ValidatorConfig;
use crate::evaluation::{EvaluationRequest, EvaluationResult};
use crate::fetch::{ContentFetcher, FetchError, FetchResult, HttpFetcher};
use crate::metrics::{
    ensure_metrics_described, EVALUATIONS_TOTAL, FETCH_ERRORS_TOTAL, FINAL_SCORE,
};
use crate::telemetry::anon_hash;

/// Long-lived; share one instance (behind `Arc` if needed) across tasks.
pub struct UrlValidator {
    fetcher: Arc<dyn ContentFetcher>,
    evaluators: Arc<dyn Evaluators>,
    weights: WeightsSource,
}

impl UrlValidator {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        evaluators: Arc<dyn Evaluators>,
        weights: WeightsSource,
    ) -> Self {
        ensure_metrics_described();
        Self {
            fetcher,
            evaluators,
            weights,
        }
    }

    /// HTTP fetcher, configured models and (hot-reloaded, if a path is set) weights.
    pub fn from_config(cfg: &ValidatorConfig) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(&cfg.fetch).context("init page fetcher")?;
        let evaluators = StandardEvaluators::from_config(cfg).context("init evaluators")?;
        let weights = match &cfg.weights_path {
            Some(path) => WeightsSource::Hot(HotReloadWeights::new(path.clone(), cfg.weights)),
            None => WeightsSource::Fixed(cfg.weights),
        };
        info!(
            target: "validator",
            fetcher = fetcher.name(),
            evaluators = evaluators.name(),
            scale = ?evaluators.scale(),
            hot_weights = cfg.weights_path.is_some(),
            "validator ready"
        );
        Ok(Self::new(Arc::new(fetcher), Arc::new(evaluators), weights))
    }

    /// Evaluate `url` against `query`. Never fails: every fetch problem comes
    /// back as [`EvaluationResult::ValidationError`].
    pub async fn evaluate(&self, query: &str, url: &str) -> EvaluationResult {
        let page = self.fetcher.fetch(url).await;
        self.finish(query, url, page).await
    }

    /// Like [`evaluate`](Self::evaluate), but stops at the next await point once
    /// `cancel` fires and reports `Error: Request cancelled.`
    pub async fn evaluate_cancellable(
        &self,
        query: &str,
        url: &str,
        cancel: &CancellationToken,
    ) -> EvaluationResult {
        let page = self.fetcher.fetch_cancellable(url, cancel).await;
        if page.is_err() {
            return self.finish(query, url, page).await;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                // The fetch itself succeeded; only the outcome is counted.
                counter!(EVALUATIONS_TOTAL, "outcome" => "validation_error").increment(1);
                info!(target: "validator", url_id = %anon_hash(url), "evaluation cancelled while scoring");
                EvaluationResult::validation_error(FetchError::Cancelled.to_string())
            }
            res = self.finish(query, url, page) => res,
        }
    }

    pub async fn evaluate_request(&self, req: &EvaluationRequest) -> EvaluationResult {
        self.evaluate(&req.query, &req.url).await
    }

    async fn finish(&self, query: &str, url: &str, page: FetchResult) -> EvaluationResult {
        let url_id = anon_hash(url);
        let query_id = anon_hash(query);

        if let Err(e) = &page {
            counter!(FETCH_ERRORS_TOTAL, "kind" => e.kind()).increment(1);
            counter!(EVALUATIONS_TOTAL, "outcome" => "validation_error").increment(1);
            info!(
                target: "validator",
                %url_id,
                %query_id,
                kind = e.kind(),
                "evaluation short-circuited on fetch error"
            );
            return EvaluationResult::validation_error(e.to_string());
        }

        let scores = self.evaluators.evaluate(query, url, &page).await;
        debug!(target: "validator", %url_id, ?scores, evaluators = self.evaluators.name(), "sub-scores");

        let result = score_page(scores, &self.weights);
        if let EvaluationResult::Rated { raw_scores, rating, .. } = &result {
            histogram!(FINAL_SCORE).record(raw_scores.final_score);
            info!(
                target: "validator",
                %url_id,
                %query_id,
                final_score = raw_scores.final_score,
                stars = rating.stars,
                "evaluation rated"
            );
        }
        counter!(EVALUATIONS_TOTAL, "outcome" => result.outcome()).increment(1);
        result
    }
}

/// Aggregate, rate and explain an already computed set of sub-scores.
pub fn score_page(scores: SubScores, weights: &WeightsSource) -> EvaluationResult {
    let w = weights.current();
    let final_score = aggregate(&scores, &w);
    let rating = to_stars(final_score);
    let explanation = explain(
        scores.domain_trust,
        scores.relevance,
        scores.fact_check,
        scores.bias,
        final_score,
    );
    EvaluationResult::rated(scores, final_score, rating, explanation)
}
