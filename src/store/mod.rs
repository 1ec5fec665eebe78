//! Scoreboard store: authoritative name -> scoreboard state behind a persistence hook.
//!
//! Every mutation holds the write lock for the whole read-modify-persist cycle,
//! so concurrent callers are serialized and additive updates are never lost.

mod persistence;

pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence, Scoreboards};

use crate::models::{GameType, PlayerDelta, Scoreboard, ScoreboardError};
use std::io;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct ScoreboardStore {
    boards: RwLock<Scoreboards>,
    persistence: Box<dyn Persistence>,
}

impl std::fmt::Debug for ScoreboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreboardStore")
            .field("boards", &self.read().len())
            .finish()
    }
}

impl ScoreboardStore {
    /// Load the initial state from `persistence`.
    pub fn open(persistence: impl Persistence + 'static) -> io::Result<Self> {
        let boards = persistence.load()?;
        log::info!("Loaded {} scoreboard(s)", boards.len());
        Ok(Self {
            boards: RwLock::new(boards),
            persistence: Box::new(persistence),
        })
    }

    /// Empty store that saves nowhere but memory.
    pub fn in_memory() -> Self {
        Self {
            boards: RwLock::new(Scoreboards::new()),
            persistence: Box::new(MemoryPersistence::new()),
        }
    }

    /// Create a new, empty, active board.
    pub fn create(&self, name: &str, game_type: GameType, owner: &str) -> Result<Scoreboard, ScoreboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScoreboardError::InvalidName);
        }
        let mut boards = self.write();
        if boards.contains_key(name) {
            return Err(ScoreboardError::AlreadyExists(name.to_string()));
        }
        let board = Scoreboard::new(name, game_type, owner);
        boards.insert(name.to_string(), board.clone());
        self.persist(&boards);
        log::info!("Created {} scoreboard {} for {}", game_type, name, owner);
        Ok(board)
    }

    /// Remove a board entirely (owner only).
    pub fn delete(&self, name: &str, requester: &str) -> Result<(), ScoreboardError> {
        let mut boards = self.write();
        boards
            .get(name)
            .ok_or_else(|| ScoreboardError::NotFound(name.to_string()))?
            .ensure_owner(requester)?;
        boards.remove(name);
        self.persist(&boards);
        log::info!("Deleted scoreboard {}", name);
        Ok(())
    }

    /// Freeze a board against mutations (owner only).
    pub fn archive(&self, name: &str, requester: &str) -> Result<(), ScoreboardError> {
        self.set_archived(name, requester, true)
    }

    pub fn unarchive(&self, name: &str, requester: &str) -> Result<(), ScoreboardError> {
        self.set_archived(name, requester, false)
    }

    fn set_archived(&self, name: &str, requester: &str, archived: bool) -> Result<(), ScoreboardError> {
        self.update(name, |board| {
            board.ensure_owner(requester)?;
            board.archived = archived;
            Ok(())
        })?;
        log::info!("Scoreboard {} archived={}", name, archived);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Scoreboard, ScoreboardError> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| ScoreboardError::NotFound(name.to_string()))
    }

    /// All boards, ordered by name ascending.
    pub fn list(&self) -> Vec<Scoreboard> {
        self.read().values().cloned().collect()
    }

    /// Full copy of the current state.
    pub fn snapshot(&self) -> Scoreboards {
        self.read().clone()
    }

    pub fn owner(&self, name: &str) -> Option<String> {
        self.read().get(name).map(|b| b.owner.clone())
    }

    pub fn add_player(&self, board: &str, player: &str) -> Result<(), ScoreboardError> {
        self.update(board, |b| b.add_player(player))
    }

    /// Move a player's record to `new_name`; fails if `new_name` is taken.
    pub fn rename_player(&self, board: &str, old_name: &str, new_name: &str) -> Result<(), ScoreboardError> {
        self.update(board, |b| b.rename_player(old_name, new_name))
    }

    /// Remove a player; removing an absent player succeeds without saving.
    pub fn remove_player(&self, board: &str, player: &str) -> Result<(), ScoreboardError> {
        self.update(board, |b| b.remove_player(player)).map(|_| ())
    }

    /// Add `delta` to one player's record and return the updated board.
    pub fn adjust_score(&self, board: &str, player: &str, delta: &PlayerDelta) -> Result<Scoreboard, ScoreboardError> {
        self.update(board, |b| {
            b.adjust_score(player, delta)?;
            Ok(b.clone())
        })
    }

    /// Run `f` against a working copy of `name` under the write lock.
    ///
    /// The copy replaces the stored board only if `f` succeeds; the full state
    /// is saved once when the board actually changed.
    pub fn update<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Scoreboard) -> Result<T, ScoreboardError>,
    ) -> Result<T, ScoreboardError> {
        let mut boards = self.write();
        let current = boards
            .get(name)
            .ok_or_else(|| ScoreboardError::NotFound(name.to_string()))?;
        let mut working = current.clone();
        let out = f(&mut working)?;
        if working != *current {
            boards.insert(name.to_string(), working);
            self.persist(&boards);
        }
        Ok(out)
    }

    fn persist(&self, boards: &Scoreboards) {
        if let Err(e) = self.persistence.save(boards) {
            log::error!("Failed to save scoreboards: {}", e);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Scoreboards> {
        self.boards.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Scoreboards> {
        self.boards.write().unwrap_or_else(PoisonError::into_inner)
    }
}
