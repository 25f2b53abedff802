//! Overall rating computation

use super::weights::{weights_for, Weight};
use crate::types::{Attributes, Position, MAX_ATTRIBUTE};

/// Score used when no valid weight table applies
pub const DEFAULT_SCORE: u8 = 50;

/// Weighted sum of the position's attributes, rounded half up.
///
/// Works in whole percentages so `73.5` always rounds to `74` with no
/// floating point drift.
pub fn compute_overall(position: Position, attributes: &Attributes) -> u8 {
    weighted_score(weights_for(position), attributes).unwrap_or(DEFAULT_SCORE)
}

/// Same as [`compute_overall`] for a raw position code; unknown codes score
/// [`DEFAULT_SCORE`].
pub fn compute_overall_for_code(code: &str, attributes: &Attributes) -> u8 {
    match Position::from_code(code) {
        Some(position) => compute_overall(position, attributes),
        None => DEFAULT_SCORE,
    }
}

fn weighted_score(weights: &[Weight], attributes: &Attributes) -> Option<u8> {
    let total_weight: u32 = weights.iter().map(|(_, weight)| weight).sum();
    if total_weight != 100 {
        return None;
    }

    let weighted: u32 = weights
        .iter()
        .map(|(attribute, weight)| u32::from(attributes.get(*attribute).min(MAX_ATTRIBUTE)) * weight)
        .sum();

    let rounded = (weighted + 50) / 100;
    Some(rounded.min(u32::from(MAX_ATTRIBUTE)) as u8)
}
