//! The four sub-score evaluators.
//!
//! Every evaluator takes the fetch outcome and scores 0 for a failed fetch,
//! so none of them ever looks at error content. None of them fails: a model
//! error is logged and scored 0.
//!
//! Domain trust and fact-check are deterministic placeholders (1..=5) standing
//! in for a real domain-authority lookup and real fact verification.

use tracing::warn;

use super::models::{SentimentModel, SimilarityModel};
use crate::fetch::FetchResult;
use crate::sentiment::{NEUTRAL, POSITIVE};

pub const BIAS_POSITIVE: u32 = 100;
pub const BIAS_NEUTRAL: u32 = 50;
pub const BIAS_OTHER: u32 = 30;

/// `(chars(url) mod 5) + 1`, or 0 when the fetch failed.
pub fn domain_trust(url: &str, page: &FetchResult) -> u32 {
    match page {
        Ok(_) => placeholder(url),
        Err(_) => 0,
    }
}

/// `(chars(content) mod 5) + 1`, or 0 when the fetch failed.
pub fn fact_check(page: &FetchResult) -> u32 {
    match page {
        Ok(p) => placeholder(&p.text),
        Err(_) => 0,
    }
}

fn placeholder(s: &str) -> u32 {
    // `% 5` keeps the value below 5, so the cast cannot truncate.
    (s.chars().count() % 5) as u32 + 1
}

/// Query/content similarity as an integer percentage in 0..=100.
pub async fn relevance(model: &dyn SimilarityModel, query: &str, page: &FetchResult) -> u32 {
    let Ok(page) = page else {
        return 0;
    };
    match model.similarity(query, &page.text).await {
        Ok(sim) => similarity_to_percent(sim),
        Err(e) => {
            warn!(target: "analyze", model = model.name(), error = %e, "similarity failed, relevance scored 0");
            0
        }
    }
}

/// Truncates toward zero; negative similarity counts as 0.
pub fn similarity_to_percent(sim: f32) -> u32 {
    if !sim.is_finite() {
        return 0;
    }
    (sim * 100.0).trunc().clamp(0.0, 100.0) as u32
}

/// Sentiment of the first `max_chars` characters mapped to a bias score.
pub async fn bias(model: &dyn SentimentModel, page: &FetchResult, max_chars: usize) -> u32 {
    let Ok(page) = page else {
        return 0;
    };
    let prefix = truncate_chars(&page.text, max_chars);
    match model.classify(prefix).await {
        Ok(label) => label_to_bias(&label),
        Err(e) => {
            warn!(target: "analyze", model = model.name(), error = %e, "classification failed, bias scored 0");
            0
        }
    }
}

/// POSITIVE → 100, NEUTRAL → 50, anything else → 30. Case-sensitive.
pub fn label_to_bias(label: &str) -> u32 {
    match label {
        POSITIVE => BIAS_POSITIVE,
        NEUTRAL => BIAS_NEUTRAL,
        _ => BIAS_OTHER,
    }
}

/// First `max` characters (not bytes) of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::mock::{FailingModel, FixedSentiment, FixedSimilarity, RecordingSentiment};
    use crate::fetch::{FetchError, PageContent};

    fn ok(text: &str) -> FetchResult {
        Ok(PageContent::new("https://example.com", text))
    }

    #[test]
    fn domain_trust_placeholder() {
        let page = ok("body");
        // 19 chars → 19 % 5 + 1 = 5
        assert_eq!(domain_trust("https://example.com", &page), 5);
        // 20 chars → 1
        assert_eq!(domain_trust("https://example.com/", &page), 1);
        assert_eq!(domain_trust("https://example.com", &Err(FetchError::Empty)), 0);
    }

    #[test]
    fn fact_check_placeholder_counts_chars() {
        assert_eq!(fact_check(&ok("abcd")), 5);
        assert_eq!(fact_check(&ok("abcde")), 1);
        // four chars, more bytes
        assert_eq!(fact_check(&ok("ééé€")), 5);
        assert_eq!(fact_check(&Err(FetchError::Timeout)), 0);
    }

    #[test]
    fn placeholders_stay_in_range() {
        for n in 0..50 {
            let s = "x".repeat(n);
            let v = fact_check(&ok(&s));
            assert!((1..=5).contains(&v));
        }
    }

    #[test]
    fn similarity_percent_truncates_and_clamps() {
        assert_eq!(similarity_to_percent(0.0), 0);
        assert_eq!(similarity_to_percent(0.756), 75);
        assert_eq!(similarity_to_percent(1.0), 100);
        assert_eq!(similarity_to_percent(-0.4), 0);
        assert_eq!(similarity_to_percent(1.7), 100);
        assert_eq!(similarity_to_percent(f32::NAN), 0);
    }

    #[test]
    fn bias_label_mapping() {
        assert_eq!(label_to_bias("POSITIVE"), 100);
        assert_eq!(label_to_bias("NEUTRAL"), 50);
        assert_eq!(label_to_bias("NEGATIVE"), 30);
        assert_eq!(label_to_bias("LABEL_2"), 30);
        assert_eq!(label_to_bias("positive"), 30);
    }

    #[test]
    fn truncate_is_char_based() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("ééé", 2), "éé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[tokio::test]
    async fn relevance_uses_model_and_short_circuits() {
        let model = FixedSimilarity(0.9);
        assert_eq!(relevance(&model, "q", &ok("content")).await, 90);
        assert_eq!(relevance(&model, "q", &Err(FetchError::Empty)).await, 0);
        assert_eq!(relevance(&FailingModel, "q", &ok("content")).await, 0);
    }

    #[tokio::test]
    async fn bias_truncates_before_classifying() {
        let model = RecordingSentiment::new("NEUTRAL");
        let text = "a".repeat(600);
        assert_eq!(bias(&model, &ok(&text), 512).await, 50);
        assert_eq!(model.last_input_chars(), Some(512));
    }

    #[tokio::test]
    async fn bias_on_error_or_failure_is_zero() {
        let model = FixedSentiment::new("POSITIVE");
        assert_eq!(bias(&model, &ok("x"), 512).await, 100);
        assert_eq!(bias(&model, &Err(FetchError::HttpStatus(500)), 512).await, 0);
        assert_eq!(bias(&FailingModel, &ok("x"), 512).await, 0);
    }
}
