//! Human-readable reasons derived from which sub-scores fell below the threshold.

pub const REASON_THRESHOLD: u32 = 50;

pub const LOW_DOMAIN_AUTHORITY: &str = "The source has low domain authority.";
pub const LOW_RELEVANCE: &str = "The content is not highly relevant to your query.";
pub const LIMITED_FACT_CHECK: &str = "Limited fact-checking verification found.";
pub const POTENTIAL_BIAS: &str = "Potential bias detected in the content.";
pub const HIGHLY_CREDIBLE: &str = "This source is highly credible and relevant.";

/// Reasons in fixed order (domain trust, relevance, fact-check, bias), joined
/// with a single space, or [`HIGHLY_CREDIBLE`] when nothing is below 50.
///
/// `_final_score` is part of the signature but does not affect the thresholds.
pub fn explain(
    domain_trust: u32,
    relevance: u32,
    fact_check: u32,
    bias: u32,
    _final_score: f64,
) -> String {
    let reasons: Vec<&str> = [
        (domain_trust, LOW_DOMAIN_AUTHORITY),
        (relevance, LOW_RELEVANCE),
        (fact_check, LIMITED_FACT_CHECK),
        (bias, POTENTIAL_BIAS),
    ]
    .into_iter()
    .filter(|(score, _)| *score < REASON_THRESHOLD)
    .map(|(_, reason)| reason)
    .collect();

    if reasons.is_empty() {
        HIGHLY_CREDIBLE.to_string()
    } else {
        reasons.join(" ")
    }
}
