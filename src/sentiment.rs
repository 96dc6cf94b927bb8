//! Offline sentiment classifier: word lexicon with short-range negation.
//!
//! Produces the same label vocabulary as the hosted classifiers
//! (`POSITIVE` / `NEUTRAL` / `NEGATIVE`) so the bias evaluator can use either.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::analyze::models::SentimentModel;

pub const POSITIVE: &str = "POSITIVE";
pub const NEUTRAL: &str = "NEUTRAL";
pub const NEGATIVE: &str = "NEGATIVE";

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (score, token count).
    /// Negation: a negator within the previous 1..=3 tokens flips the word's sign.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }

        (score, tokens.len())
    }

    pub fn label(&self, text: &str) -> &'static str {
        match self.score_text(text).0 {
            s if s > 0 => POSITIVE,
            0 => NEUTRAL,
            _ => NEGATIVE,
        }
    }
}

#[async_trait]
impl SentimentModel for LexiconSentiment {
    async fn classify(&self, text: &str) -> anyhow::Result<String> {
        Ok(self.label(text).to_string())
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Alphanumeric tokens, lower-cased. Apostrophes stay inside words ("isn't").
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
            | "hardly"
    )
}
