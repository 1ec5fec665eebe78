//! Elo rating calculation for two-player outcomes.

use serde::{Deserialize, Serialize};

/// Default K-factor for Elo updates (higher = more volatile).
pub const K_FACTOR: f64 = 32.0;

/// Rating change applied by one Elo event. Player B always receives `-change`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EloUpdate {
    pub player_a: String,
    pub player_b: String,
    pub change: i64,
}

/// Expected score of a player rated `ra` against one rated `rb`.
///
/// `10^(ra/400) / (10^(ra/400) + 10^(rb/400))`, evaluated on the rating gap so
/// large ratings do not overflow.
pub fn expected_score(ra: i64, rb: i64) -> f64 {
    1.0 / (1.0 + 10f64.powf(rb.saturating_sub(ra) as f64 / 400.0))
}

/// Rating delta for player A given outcome `score` (1 = win, 0.5 = draw, 0 = loss).
///
/// Rounded to the nearest integer, but never zero: the minimum move is one
/// point, toward A unless A scored below expectation.
pub fn calculate_elo_change(ra: i64, rb: i64, score: f64, k: f64) -> i64 {
    let surprise = score - expected_score(ra, rb);
    let change = (k * surprise).round() as i64;
    if change == 0 {
        return if surprise < 0.0 { -1 } else { 1 };
    }
    change
}
