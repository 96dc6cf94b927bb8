//! evaluation.rs: request and result shapes of a single credibility evaluation.
//!
//! `EvaluationResult` serializes to exactly one of two JSON objects:
//!
//! ```json
//! {"validation_error": "Error: Request timed out."}
//! {"raw_scores": {"domain_trust": 80, "relevance": 90, "fact_check": 70, "bias": 100,
//!                 "final_score": 85.0},
//!  "rating": {"stars": 4, "icon": "⭐⭐⭐⭐"},
//!  "explanation": "This source is highly credible and relevant."}
//! ```

use serde::{Deserialize, Serialize};

use crate::analyze::rating::StarRating;
use crate::analyze::scoring::SubScores;

/// One query/URL pair to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(alias = "user_prompt")]
    pub query: String,
    #[serde(alias = "url_to_check")]
    pub url: String,
}

impl EvaluationRequest {
    pub fn new(query: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            url: url.into(),
        }
    }
}

/// The four sub-scores plus the weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawScores {
    #[serde(flatten)]
    pub sub_scores: SubScores,
    pub final_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvaluationResult {
    /// The page could not be fetched or had no readable text.
    ValidationError { validation_error: String },
    Rated {
        raw_scores: RawScores,
        rating: StarRating,
        explanation: String,
    },
}

impl EvaluationResult {
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError {
            validation_error: message.into(),
        }
    }

    pub fn rated(
        sub_scores: SubScores,
        final_score: f64,
        rating: StarRating,
        explanation: impl Into<String>,
    ) -> Self {
        Self::Rated {
            raw_scores: RawScores {
                sub_scores,
                final_score,
            },
            rating,
            explanation: explanation.into(),
        }
    }

    pub fn is_rated(&self) -> bool {
        matches!(self, Self::Rated { .. })
    }

    /// Error message, if this is a validation error.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::ValidationError { validation_error } => Some(validation_error),
            Self::Rated { .. } => None,
        }
    }

    /// Star count, 0 for a validation error.
    pub fn stars(&self) -> u8 {
        match self {
            Self::ValidationError { .. } => 0,
            Self::Rated { rating, .. } => rating.stars,
        }
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "validation_error",
            Self::Rated { .. } => "rated",
        }
    }
}
