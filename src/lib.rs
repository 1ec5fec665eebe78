//! Score keeper: typed scoreboards, score expressions, Elo ratings and ranked standings.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{EngineConfig, ServerConfig};
pub use logic::{
    calculate_elo_change, is_valid_score_string, standings, EloUpdate, MarkedScore, ScoreExpression,
    ScoreKeeper, ScoreToken, Standings, StandingsRow, View,
};
pub use models::{GameType, PlayerDelta, PlayerRecord, Scoreboard, ScoreboardError, DEFAULT_ELO};
pub use store::{JsonFilePersistence, MemoryPersistence, Persistence, ScoreboardStore, Scoreboards};
