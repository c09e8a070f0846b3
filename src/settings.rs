//! Game settings and preferences
//!
//! Read from a JSON file next to the binary. Every field has a default, so a
//! partial file only overrides what it names.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::TARGET_FPS;
use crate::error::SettingsError;

/// Default settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Longest demo session accepted (one day)
pub const MAX_DEMO_SECONDS: f32 = 86_400.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frame rate cap
    pub target_fps: u32,
    /// Where the best score is kept
    pub high_score_path: PathBuf,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Demo ===
    /// Let the autopilot play
    pub autopilot: bool,
    /// Length of a headless demo session (seconds of wall time)
    pub demo_seconds: f32,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            high_score_path: PathBuf::from("highscore.txt"),

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.25,

            show_fps: true,

            autopilot: true,
            demo_seconds: 120.0,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from a file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(settings.sanitized())
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    /// Pull out-of-range values back into range
    fn sanitized(mut self) -> Self {
        self.target_fps = self.target_fps.max(1);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.demo_seconds = if self.demo_seconds.is_finite() {
            self.demo_seconds.clamp(0.0, MAX_DEMO_SECONDS)
        } else {
            Self::default().demo_seconds
        };
        self
    }

    /// Demo session length, if it fits a `Duration`
    pub fn demo_length(&self) -> Option<Duration> {
        Duration::try_from_secs_f32(self.demo_seconds).ok()
    }

    /// Effective sound-effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        self.master_volume * self.music_volume
    }
}
