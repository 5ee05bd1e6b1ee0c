//! Runner settings
//!
//! Persisted as JSON next to the high score table. Every field has a default,
//! so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::MAX_RANDOM_POWERUPS;
use crate::persistence::{self, PersistError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Level file; the built-in levels are used when unset
    pub levels_path: Option<PathBuf>,
    pub highscores_path: PathBuf,
    pub start_level: u32,
    /// Stop the run after this many frames (0 = no limit)
    pub max_frames: u64,
    /// Initials recorded for a qualifying score
    pub player_name: String,
    pub max_random_powerups: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x4B4F_4E47,
            levels_path: None,
            highscores_path: PathBuf::from("highscores.json"),
            start_level: 1,
            max_frames: 60 * 60 * 5,
            player_name: "DEMO".to_string(),
            max_random_powerups: MAX_RANDOM_POWERUPS,
        }
    }
}

impl Settings {
    /// Load from disk, falling back to defaults when the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match persistence::load_json::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json_atomic(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Frame limit, if any
    pub fn frame_limit(&self) -> Option<u64> {
        (self.max_frames > 0).then_some(self.max_frames)
    }
}
