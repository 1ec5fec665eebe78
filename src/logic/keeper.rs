//! The scoring engine: validates score expressions against a board's game type,
//! computes Elo changes, applies tallies through the store, and builds standings.

use crate::config::EngineConfig;
use crate::logic::elo::{calculate_elo_change, EloUpdate};
use crate::logic::ranking::{self, Standings, View};
use crate::logic::score::ScoreExpression;
use crate::models::{GameType, PlayerDelta, Scoreboard, ScoreboardError};
use crate::store::ScoreboardStore;
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of one accepted score event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkedScore {
    /// Board state after the event.
    pub board: Scoreboard,
    /// Per-player changes applied, including Elo.
    pub deltas: BTreeMap<String, PlayerDelta>,
    pub elo: Option<EloUpdate>,
    /// Capped standings with the affected players highlighted.
    pub standings: Standings,
}

/// Scoring engine over an injected store.
#[derive(Debug)]
pub struct ScoreKeeper {
    store: ScoreboardStore,
    config: EngineConfig,
}

impl ScoreKeeper {
    pub fn new(store: ScoreboardStore, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &ScoreboardStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn create_scoreboard(&self, name: &str, game_type: GameType, owner: &str) -> Result<Scoreboard, ScoreboardError> {
        self.store.create(name, game_type, owner)
    }

    pub fn delete_scoreboard(&self, name: &str, requester: &str) -> Result<(), ScoreboardError> {
        self.store.delete(name, requester)
    }

    pub fn archive_scoreboard(&self, name: &str, requester: &str) -> Result<(), ScoreboardError> {
        self.store.archive(name, requester)
    }

    pub fn unarchive_scoreboard(&self, name: &str, requester: &str) -> Result<(), ScoreboardError> {
        self.store.unarchive(name, requester)
    }

    pub fn scoreboard(&self, name: &str) -> Result<Scoreboard, ScoreboardError> {
        self.store.get(name)
    }

    pub fn scoreboards(&self) -> Vec<Scoreboard> {
        self.store.list()
    }

    pub fn add_player(&self, board: &str, player: &str) -> Result<(), ScoreboardError> {
        self.store.add_player(board, player)
    }

    /// Add several players; those already on the board are skipped.
    /// Returns the names actually added.
    pub fn add_players(&self, board: &str, players: &[&str]) -> Result<Vec<String>, ScoreboardError> {
        self.store.update(board, |b| {
            let mut added = Vec::new();
            for player in players {
                match b.add_player(player) {
                    Ok(()) => added.push(player.trim().to_string()),
                    Err(ScoreboardError::AlreadyOnBoard { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(added)
        })
    }

    pub fn rename_player(&self, board: &str, old_name: &str, new_name: &str) -> Result<(), ScoreboardError> {
        self.store.rename_player(board, old_name, new_name)
    }

    pub fn remove_player(&self, board: &str, player: &str) -> Result<(), ScoreboardError> {
        self.store.remove_player(board, player)
    }

    /// Validate `expression` against `board` and apply it as one atomic update.
    pub fn mark_score(&self, board: &str, expression: &str) -> Result<MarkedScore, ScoreboardError> {
        let raw = expression;
        let k = self.config.k_factor;

        // The board lookup in `update` runs first, so an unknown board wins over a bad expression.
        let (updated, deltas, elo) = self.store.update(board, |b| {
            let expression = ScoreExpression::parse(raw)?;
            b.ensure_active()?;
            expression.validate(b.game_type)?;
            let mut deltas = expression.bundle(b)?;

            let elo = if b.game_type == GameType::Elo {
                let outcome = expression.elo_outcome()?;
                let ra = b.player(&outcome.player_a)?.elo;
                let rb = b.player(&outcome.player_b)?.elo;
                let change = calculate_elo_change(ra, rb, outcome.score, k);
                deltas.entry(outcome.player_a.clone()).or_default().elo += change;
                deltas.entry(outcome.player_b.clone()).or_default().elo -= change;
                Some(EloUpdate {
                    player_a: outcome.player_a,
                    player_b: outcome.player_b,
                    change,
                })
            } else {
                None
            };

            for (player, delta) in &deltas {
                b.adjust_score(player, delta)?;
            }
            Ok((b.clone(), deltas, elo))
        })?;

        log::info!(
            "Marked \"{}\" on {} ({} player(s))",
            raw.trim(),
            board,
            deltas.len()
        );
        if let Some(e) = &elo {
            log::debug!("Elo change on {}: {} {:+}, {} {:+}", board, e.player_a, e.change, e.player_b, -e.change);
        }

        let highlight: Vec<String> = deltas.keys().cloned().collect();
        let standings = ranking::standings(&updated, View::Top(self.config.top_n), &highlight);
        Ok(MarkedScore {
            board: updated,
            deltas,
            elo,
            standings,
        })
    }

    /// Ranked view of `board`. `View::Top` uses the configured top-N when `n` is zero.
    pub fn standings(&self, board: &str, view: View, highlight: &[String]) -> Result<Standings, ScoreboardError> {
        let board = self.store.get(board)?;
        let view = match view {
            View::Top(0) => View::Top(self.config.top_n),
            other => other,
        };
        Ok(ranking::standings(&board, view, highlight))
    }
}
