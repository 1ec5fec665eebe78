//! Persistence hook for the scoreboard store: load once, save the whole mapping after every mutation.

use crate::models::Scoreboard;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Every scoreboard, keyed by name.
pub type Scoreboards = BTreeMap<String, Scoreboard>;

/// Backing storage for [`ScoreboardStore`](crate::store::ScoreboardStore).
///
/// `save` receives the complete state and replaces whatever was stored before.
pub trait Persistence: Send + Sync {
    fn load(&self) -> io::Result<Scoreboards>;
    fn save(&self, boards: &Scoreboards) -> io::Result<()>;
}

impl<P: Persistence + ?Sized> Persistence for Arc<P> {
    fn load(&self) -> io::Result<Scoreboards> {
        (**self).load()
    }

    fn save(&self, boards: &Scoreboards) -> io::Result<()> {
        (**self).save(boards)
    }
}

/// Keeps the last saved snapshot in memory. Used by tests and ephemeral servers.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Scoreboards>,
    saves: AtomicUsize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of boards.
    pub fn with_boards(boards: Scoreboards) -> Self {
        Self {
            saved: Mutex::new(boards),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of `save` calls received so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the most recently saved state.
    pub fn saved(&self) -> Scoreboards {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> io::Result<Scoreboards> {
        Ok(self.saved())
    }

    fn save(&self, boards: &Scoreboards) -> io::Result<()> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = boards.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Stores all boards as one pretty-printed JSON document.
#[derive(Clone, Debug)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFilePersistence {
    /// A missing file is an empty store.
    fn load(&self) -> io::Result<Scoreboards> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Scoreboards::new()),
            Err(e) => return Err(e),
        };
        if raw.trim().is_empty() {
            return Ok(Scoreboards::new());
        }
        serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write to a sibling temp file, then rename over the target.
    fn save(&self, boards: &Scoreboards) -> io::Result<()> {
        let json = serde_json::to_string_pretty(boards)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}
