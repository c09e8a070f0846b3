//! Error types for the collaborators at the edge of the game
//!
//! None of these reach the simulation. Each is caught where it arises and
//! replaced by a fallback (placeholder art, a zero high score, default
//! settings) with a warning in the log.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Asset lookup failure
#[derive(Debug, Error)]
pub enum AssetError {
    /// The source has no asset under this name
    #[error("asset '{name}' not found")]
    NotFound { name: String },

    /// The source has the asset but could not decode it
    #[error("asset '{name}' could not be decoded: {reason}")]
    Decode { name: String, reason: String },

    /// This source cannot produce the requested kind of asset at all
    #[error("{kind} assets are not available from this source")]
    Unsupported { kind: &'static str },
}

/// High score storage failure
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("high score file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("high score file {path} holds '{content}', not a number")]
    Parse { path: PathBuf, content: String },
}

/// Settings file failure
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
