//! Scoring business logic: score expressions, Elo, ranking, and the engine tying them to the store.

mod elo;
mod keeper;
mod ranking;
mod score;

pub use elo::{calculate_elo_change, expected_score, EloUpdate, K_FACTOR};
pub use keeper::{MarkedScore, ScoreKeeper};
pub use ranking::{
    compare_records, format_win_ratio, sort_players, standings, win_ratio, RankedPlayer, Standings,
    StandingsRow, View, DEFAULT_TOP_N,
};
pub use score::{is_valid_score_string, EloOutcome, ScoreExpression, ScoreTarget, ScoreToken};
