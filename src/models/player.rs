//! PlayerRecord and PlayerDelta data structures.

use serde::{Deserialize, Serialize};

/// Rating every player starts with when joining an Elo board.
pub const DEFAULT_ELO: i64 = 1500;

/// Cumulative tallies for one player on one scoreboard.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Signed running total, only meaningful on points boards.
    pub points: i64,
    pub elo: i64,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self {
            wins: 0,
            losses: 0,
            draws: 0,
            points: 0,
            elo: DEFAULT_ELO,
        }
    }
}

impl PlayerRecord {
    /// Fresh record: zero tallies, default rating.
    pub fn new() -> Self {
        Self::default()
    }

    /// Games that count toward the win ratio (draws excluded).
    pub fn decided_games(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// Add a delta to this record. Counters saturate instead of wrapping.
    pub fn apply(&mut self, delta: &PlayerDelta) {
        self.wins = self.wins.saturating_add(delta.wins);
        self.losses = self.losses.saturating_add(delta.losses);
        self.draws = self.draws.saturating_add(delta.draws);
        self.points = self.points.saturating_add(delta.points);
        self.elo = self.elo.saturating_add(delta.elo);
    }
}

/// Change to apply to a PlayerRecord for one score event.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerDelta {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: i64,
    pub elo: i64,
}

impl PlayerDelta {
    /// Fold another delta into this one (several tokens for the same player).
    pub fn merge(&mut self, other: &PlayerDelta) {
        self.wins = self.wins.saturating_add(other.wins);
        self.losses = self.losses.saturating_add(other.losses);
        self.draws = self.draws.saturating_add(other.draws);
        self.points = self.points.saturating_add(other.points);
        self.elo = self.elo.saturating_add(other.elo);
    }
}
