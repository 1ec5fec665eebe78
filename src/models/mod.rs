//! Data structures for the score keeper: scoreboards, player records, errors.

mod player;
mod scoreboard;

pub use player::{PlayerDelta, PlayerRecord, DEFAULT_ELO};
pub use scoreboard::{GameType, Scoreboard, ScoreboardError};
