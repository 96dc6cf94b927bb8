//! Deterministic stand-ins for the inference capabilities and the evaluator set.
//! Used by tests and for dry runs that must not depend on model output.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::evaluators::Evaluators;
use super::models::{SentimentModel, SimilarityModel};
use super::scoring::SubScores;
use crate::fetch::FetchResult;

/// Always returns the same similarity.
#[derive(Debug, Clone, Copy)]
pub struct FixedSimilarity(pub f32);

#[async_trait]
impl SimilarityModel for FixedSimilarity {
    async fn similarity(&self, _a: &str, _b: &str) -> Result<f32> {
        Ok(self.0)
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Always returns the same label.
#[derive(Debug, Clone)]
pub struct FixedSentiment {
    label: String,
}

impl FixedSentiment {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[async_trait]
impl SentimentModel for FixedSentiment {
    async fn classify(&self, _text: &str) -> Result<String> {
        Ok(self.label.clone())
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Fixed label, remembers what it was asked to classify.
#[derive(Debug, Default)]
pub struct RecordingSentiment {
    label: String,
    last_input: Mutex<Option<String>>,
}

impl RecordingSentiment {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            last_input: Mutex::new(None),
        }
    }

    pub fn last_input_chars(&self) -> Option<usize> {
        self.last_input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.chars().count())
    }
}

#[async_trait]
impl SentimentModel for RecordingSentiment {
    async fn classify(&self, text: &str) -> Result<String> {
        *self.last_input.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(self.label.clone())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Every call fails, e.g. an unreachable inference endpoint.
#[derive(Debug, Clone, Copy)]
pub struct FailingModel;

#[async_trait]
impl SimilarityModel for FailingModel {
    async fn similarity(&self, _a: &str, _b: &str) -> Result<f32> {
        Err(anyhow!("model unavailable"))
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

#[async_trait]
impl SentimentModel for FailingModel {
    async fn classify(&self, _text: &str) -> Result<String> {
        Err(anyhow!("model unavailable"))
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Returns preset sub-scores for any successful fetch and counts its calls.
#[derive(Debug, Clone)]
pub struct FixedEvaluators {
    scores: SubScores,
    calls: Arc<AtomicUsize>,
}

impl FixedEvaluators {
    pub fn new(scores: SubScores) -> Self {
        Self {
            scores,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter; clone it before handing the evaluators to a validator.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Evaluators for FixedEvaluators {
    async fn evaluate(&self, _query: &str, _url: &str, page: &FetchResult) -> SubScores {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if page.is_err() {
            return SubScores::default();
        }
        self.scores
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
