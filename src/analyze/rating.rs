//! Final score → 1..=5 stars.

use serde::{Deserialize, Serialize};

pub const STAR_GLYPH: &str = "⭐";
pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRating {
    pub stars: u8,
    /// `stars` repetitions of [`STAR_GLYPH`].
    pub icon: String,
}

/// `clamp(round(final_score / 20), 1, 5)`.
///
/// Halves round to even (2.5 → 2, 3.5 → 4). A score of 0 still earns one star.
pub fn to_stars(final_score: f64) -> StarRating {
    let rounded = (final_score / 20.0).round_ties_even();
    let stars = if rounded.is_nan() {
        MIN_STARS
    } else {
        rounded.clamp(f64::from(MIN_STARS), f64::from(MAX_STARS)) as u8
    };
    StarRating {
        stars,
        icon: STAR_GLYPH.repeat(usize::from(stars)),
    }
}
