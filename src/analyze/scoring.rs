//! Sub-score container and the weighted aggregation.
//!
//! final = w_domain_trust*domain_trust + w_relevance*relevance
//!       + w_fact_check*fact_check + w_bias*bias
//!
//! No normalization beyond the weights. With the default weights and every
//! input on the 0..=100 scale, the result lies in [0, 100].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::weights::ScoreWeights;

/// The four sub-scores as they enter the aggregator and the explanation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub domain_trust: u32,
    pub relevance: u32,
    pub fact_check: u32,
    pub bias: u32,
}

impl SubScores {
    pub fn new(domain_trust: u32, relevance: u32, fact_check: u32, bias: u32) -> Self {
        Self {
            domain_trust,
            relevance,
            fact_check,
            bias,
        }
    }
}

/// How the 1..=5 placeholder scores (domain trust, fact-check) are put next to
/// the 0..=100 scores (relevance, bias).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreScale {
    /// Multiply placeholders by 20 so all four share the 0..=100 scale.
    #[default]
    Rescaled,
    /// Keep placeholders at 1..=5. Domain trust and fact-check then always
    /// fall below the explanation threshold and barely move the final score.
    Raw,
}

impl ScoreScale {
    pub const PLACEHOLDER_FACTOR: u32 = 20;

    /// Bring a 0..=5 placeholder onto this scale.
    pub fn placeholder(self, raw: u32) -> u32 {
        match self {
            Self::Rescaled => raw * Self::PLACEHOLDER_FACTOR,
            Self::Raw => raw,
        }
    }
}

impl FromStr for ScoreScale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rescaled" => Ok(Self::Rescaled),
            "raw" => Ok(Self::Raw),
            other => Err(anyhow::anyhow!(
                "unknown score scale `{other}` (expected rescaled|raw)"
            )),
        }
    }
}

/// Weighted sum of the four sub-scores.
pub fn aggregate(scores: &SubScores, w: &ScoreWeights) -> f64 {
    w.domain_trust * f64::from(scores.domain_trust)
        + w.relevance * f64::from(scores.relevance)
        + w.fact_check * f64::from(scores.fact_check)
        + w.bias * f64::from(scores.bias)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_weights_on_common_scale() {
        let s = SubScores::new(80, 90, 70, 100);
        let f = aggregate(&s, &ScoreWeights::default());
        assert!(approx(f, 85.0), "got {f}");
    }

    #[test]
    fn all_zero_and_all_max() {
        let w = ScoreWeights::default();
        assert!(approx(aggregate(&SubScores::default(), &w), 0.0));
        assert!(approx(
            aggregate(&SubScores::new(100, 100, 100, 100), &w),
            100.0
        ));
    }

    #[test]
    fn placeholder_scaling() {
        assert_eq!(ScoreScale::Rescaled.placeholder(3), 60);
        assert_eq!(ScoreScale::Rescaled.placeholder(0), 0);
        assert_eq!(ScoreScale::Raw.placeholder(3), 3);
    }

    #[test]
    fn both_scale_interpretations() {
        // Placeholders: domain trust 3, fact-check 2; relevance 90, bias 100.
        let w = ScoreWeights::default();

        let raw = SubScores::new(
            ScoreScale::Raw.placeholder(3),
            90,
            ScoreScale::Raw.placeholder(2),
            100,
        );
        // 0.9 + 27 + 0.4 + 20
        assert!(approx(aggregate(&raw, &w), 48.3));

        let rescaled = SubScores::new(
            ScoreScale::Rescaled.placeholder(3),
            90,
            ScoreScale::Rescaled.placeholder(2),
            100,
        );
        // 18 + 27 + 8 + 20
        assert!(approx(aggregate(&rescaled, &w), 73.0));
    }

    #[test]
    fn custom_weights_are_not_normalized() {
        let w = ScoreWeights {
            domain_trust: 1.0,
            relevance: 1.0,
            fact_check: 0.0,
            bias: 0.0,
        };
        assert!(approx(aggregate(&SubScores::new(50, 50, 100, 100), &w), 100.0));
    }

    #[test]
    fn scale_parses_case_insensitively() {
        assert_eq!("RAW".parse::<ScoreScale>().unwrap(), ScoreScale::Raw);
        assert_eq!(" rescaled ".parse::<ScoreScale>().unwrap(), ScoreScale::Rescaled);
        assert!("x20".parse::<ScoreScale>().is_err());
    }
}
