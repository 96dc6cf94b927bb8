// src/analyze/mod.rs
//! Scoring pipeline: sub-score evaluators, aggregation, rating and explanation.

pub mod evaluators;
pub mod explain;
pub mod mock;
pub mod models;
pub mod rating;
pub mod scoring;
pub mod subscores;
pub mod weights;

// Re-export convenient types.
pub use crate::analyze::evaluators::{Evaluators, StandardEvaluators};
pub use crate::analyze::explain::explain;
pub use crate::analyze::models::{build_models, SentimentModel, SimilarityModel};
pub use crate::analyze::rating::{to_stars, StarRating};
pub use crate::analyze::scoring::{aggregate, ScoreScale, SubScores};
pub use crate::analyze::weights::{HotReloadWeights, ScoreWeights, WeightsSource};
