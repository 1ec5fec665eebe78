//! Scoreboard, GameType and the error type shared by the store and the engine.

use crate::models::player::{PlayerDelta, PlayerRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Errors that can occur during scoreboard operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScoreboardError {
    /// No scoreboard with this name.
    NotFound(String),
    /// A scoreboard with this name already exists.
    AlreadyExists(String),
    /// Only the owner may archive, unarchive or delete a board.
    NotOwner { board: String, owner: String },
    /// Player is not on the board.
    PlayerNotFound { board: String, player: String },
    /// Player name is already taken on the board.
    AlreadyOnBoard { board: String, player: String },
    /// Malformed or rule-violating score expression; carries the raw input.
    InvalidScoreExpression { expression: String, reason: String },
    /// Board is archived and rejects mutations.
    ArchivedBoard(String),
    /// Empty board or player name.
    InvalidName,
    /// Unknown game type string.
    UnknownGameType(String),
}

impl std::fmt::Display for ScoreboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreboardError::NotFound(board) => write!(f, "No scoreboard named {}", board),
            ScoreboardError::AlreadyExists(board) => write!(f, "Scoreboard {} already exists", board),
            ScoreboardError::NotOwner { board, owner } => {
                write!(f, "Only the owner of {} ({}) can do that", board, owner)
            }
            ScoreboardError::PlayerNotFound { board, player } => {
                write!(f, "{} is not on {}", player, board)
            }
            ScoreboardError::AlreadyOnBoard { board, player } => {
                write!(f, "{} is already on {}", player, board)
            }
            ScoreboardError::InvalidScoreExpression { expression, reason } => {
                write!(f, "Invalid score \"{}\": {}", expression, reason)
            }
            ScoreboardError::ArchivedBoard(board) => write!(f, "Scoreboard {} is archived", board),
            ScoreboardError::InvalidName => write!(f, "Name must not be empty"),
            ScoreboardError::UnknownGameType(t) => {
                write!(f, "Unknown game type {} (expected points, winloss, zerosum or elo)", t)
            }
        }
    }
}

impl std::error::Error for ScoreboardError {}

/// Game style of a board; fixed at creation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Signed running point totals.
    Points,
    /// Wins and losses, no balancing.
    WinLoss,
    /// Wins and losses that must balance to zero per event.
    ZeroSum,
    /// Zero-sum two-player outcomes with Elo ratings.
    Elo,
}

impl GameType {
    /// Whether every score event must net to zero across its participants.
    pub fn is_zero_sum(self) -> bool {
        matches!(self, GameType::ZeroSum | GameType::Elo)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameType::Points => "points",
            GameType::WinLoss => "winloss",
            GameType::ZeroSum => "zerosum",
            GameType::Elo => "elo",
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ScoreboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "points" => Ok(GameType::Points),
            "winloss" => Ok(GameType::WinLoss),
            "zerosum" => Ok(GameType::ZeroSum),
            "elo" => Ok(GameType::Elo),
            other => Err(ScoreboardError::UnknownGameType(other.to_string())),
        }
    }
}

/// A named, typed collection of player tallies.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub name: String,
    #[serde(rename = "type")]
    pub game_type: GameType,
    pub owner: String,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    /// Player name -> tallies. Names are unique per board.
    pub players: BTreeMap<String, PlayerRecord>,
}

impl Scoreboard {
    /// Create an empty, active board.
    pub fn new(name: impl Into<String>, game_type: GameType, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            game_type,
            owner: owner.into(),
            archived: false,
            created_at: Utc::now(),
            players: BTreeMap::new(),
        }
    }

    pub fn has_player(&self, player: &str) -> bool {
        self.players.contains_key(player)
    }

    pub fn player(&self, player: &str) -> Result<&PlayerRecord, ScoreboardError> {
        self.players
            .get(player)
            .ok_or_else(|| self.player_not_found(player))
    }

    pub fn is_owned_by(&self, requester: &str) -> bool {
        self.owner == requester
    }

    /// Fail with `NotOwner` unless `requester` created this board.
    pub fn ensure_owner(&self, requester: &str) -> Result<(), ScoreboardError> {
        if !self.is_owned_by(requester) {
            return Err(ScoreboardError::NotOwner {
                board: self.name.clone(),
                owner: self.owner.clone(),
            });
        }
        Ok(())
    }

    /// Fail with `ArchivedBoard` if the board rejects mutations.
    pub fn ensure_active(&self) -> Result<(), ScoreboardError> {
        if self.archived {
            return Err(ScoreboardError::ArchivedBoard(self.name.clone()));
        }
        Ok(())
    }

    /// Add a player with a fresh record (active boards only).
    pub fn add_player(&mut self, player: &str) -> Result<(), ScoreboardError> {
        self.ensure_active()?;
        let player = player.trim();
        if player.is_empty() {
            return Err(ScoreboardError::InvalidName);
        }
        if self.has_player(player) {
            return Err(ScoreboardError::AlreadyOnBoard {
                board: self.name.clone(),
                player: player.to_string(),
            });
        }
        self.players.insert(player.to_string(), PlayerRecord::new());
        Ok(())
    }

    /// Move a record to a new name. The new name must be free.
    pub fn rename_player(&mut self, old_name: &str, new_name: &str) -> Result<(), ScoreboardError> {
        self.ensure_active()?;
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ScoreboardError::InvalidName);
        }
        if !self.has_player(old_name) {
            return Err(self.player_not_found(old_name));
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.has_player(new_name) {
            return Err(ScoreboardError::AlreadyOnBoard {
                board: self.name.clone(),
                player: new_name.to_string(),
            });
        }
        if let Some(record) = self.players.remove(old_name) {
            self.players.insert(new_name.to_string(), record);
        }
        Ok(())
    }

    /// Remove a player. Returns whether anything was removed; absent players are a no-op.
    pub fn remove_player(&mut self, player: &str) -> Result<bool, ScoreboardError> {
        self.ensure_active()?;
        Ok(self.players.remove(player).is_some())
    }

    /// Add `delta` to a player's record.
    pub fn adjust_score(&mut self, player: &str, delta: &PlayerDelta) -> Result<(), ScoreboardError> {
        self.ensure_active()?;
        let board = self.name.clone();
        let record = self
            .players
            .get_mut(player)
            .ok_or_else(|| ScoreboardError::PlayerNotFound {
                board,
                player: player.to_string(),
            })?;
        record.apply(delta);
        Ok(())
    }

    pub(crate) fn player_not_found(&self, player: &str) -> ScoreboardError {
        ScoreboardError::PlayerNotFound {
            board: self.name.clone(),
            player: player.to_string(),
        }
    }
}
