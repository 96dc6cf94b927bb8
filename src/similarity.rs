// src/similarity.rs
//! Vector similarity helpers and the offline similarity model.
//!
//! The offline model embeds each text as a term-frequency vector over
//! lower-cased word tokens and compares the two with cosine similarity.
//! Deterministic, no network, good enough to tell on-topic from off-topic.

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyze::models::SimilarityModel;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\b\w+\b").expect("word regex"));

/// Words too common to say anything about topic.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "do", "does", "for", "from", "has", "have",
    "how", "in", "is", "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "were",
    "what", "when", "where", "which", "who", "why", "will", "with",
];

/// Cosine similarity of two dense vectors; 0.0 on length mismatch or zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Sparse term-frequency embedding.
pub fn term_vector(text: &str) -> HashMap<String, f32> {
    let mut tf = HashMap::new();
    for m in WORD.find_iter(text) {
        let tok = m.as_str().to_lowercase();
        if STOPWORDS.contains(&tok.as_str()) {
            continue;
        }
        *tf.entry(tok).or_insert(0.0) += 1.0;
    }
    tf
}

/// Cosine similarity over sparse term vectors.
pub fn sparse_cosine(a: &HashMap<String, f32>, b: &HashMap<String, f32>) -> f32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f32 = small
        .iter()
        .filter_map(|(k, x)| large.get(k).map(|y| x * y))
        .sum();
    let norm_a: f32 = a.values().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.values().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, a: &str, b: &str) -> f32 {
        sparse_cosine(&term_vector(a), &term_vector(b))
    }
}

#[async_trait]
impl SimilarityModel for LexicalSimilarity {
    async fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f32> {
        Ok(self.score(a, b))
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}
