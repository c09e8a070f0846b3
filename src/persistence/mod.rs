//! High score storage backends
//!
//! The stored value is a single non-negative integer in plain text. Backends
//! report failures as `PersistError`; `HighScore` decides how to recover.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::PersistError;

/// Somewhere the best score lives between sessions
pub trait HighScoreStore {
    /// Stored score; `Ok(None)` when nothing has been stored yet
    fn read(&self) -> Result<Option<u64>, PersistError>;
    /// Replace the stored score
    fn write(&mut self, score: u64) -> Result<(), PersistError>;
}

/// Plain-text file holding the score
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn read(&self) -> Result<Option<u64>, PersistError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let trimmed = text.trim();
        // An empty file counts as zero
        if trimmed.is_empty() {
            return Ok(Some(0));
        }
        trimmed
            .parse::<u64>()
            .map(Some)
            .map_err(|_| PersistError::Parse {
                path: self.path.clone(),
                content: trimmed.chars().take(32).collect(),
            })
    }

    fn write(&mut self, score: u64) -> Result<(), PersistError> {
        fs::write(&self.path, score.to_string()).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// and watch what the game writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Rc<Cell<Option<u64>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        let store = Self::default();
        store.saved.set(Some(score));
        store
    }

    pub fn saved(&self) -> Option<u64> {
        self.saved.get()
    }

    /// How many times the score was written
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn read(&self) -> Result<Option<u64>, PersistError> {
        Ok(self.saved.get())
    }

    fn write(&mut self, score: u64) -> Result<(), PersistError> {
        self.saved.set(Some(score));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
