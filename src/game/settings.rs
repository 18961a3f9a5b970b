use crate::model::Difficulty;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::session::TIME_WARNING_THRESHOLD;

/// Names the JSON settings file the console host loads.
pub const SETTINGS_PATH_VAR: &str = "TEMPLE_SETTINGS";

const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot access settings file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    /// First number shown by the pre-round countdown.
    #[serde(default = "default_countdown_from")]
    pub countdown_from: u8,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_time_warning_threshold")]
    pub time_warning_threshold: u32,

    #[serde(default = "default_leaderboard_display_limit")]
    pub leaderboard_display_limit: usize,

    #[serde(default)]
    pub leaderboard_capacity: Option<usize>,
}

// Helper functions for default values
fn default_version() -> u32 {
    SETTINGS_VERSION
}
fn default_countdown_from() -> u8 {
    3
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_time_warning_threshold() -> u32 {
    TIME_WARNING_THRESHOLD
}
fn default_leaderboard_display_limit() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            difficulty: Difficulty::default(),
            countdown_from: default_countdown_from(),
            tick_interval_ms: default_tick_interval_ms(),
            time_warning_threshold: default_time_warning_threshold(),
            leaderboard_display_limit: default_leaderboard_display_limit(),
            leaderboard_capacity: None,
        }
    }
}

impl Settings {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let mut settings = serde_json::from_str::<Settings>(contents)?;
        settings.migrate();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reads and migrates the settings stored at `path`.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_json(&contents)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Loads from the file named by `TEMPLE_SETTINGS`. A missing file is
    /// created with the defaults; an unreadable or malformed one is left
    /// alone and the defaults are used.
    pub fn load() -> Self {
        let Some(path) = Self::path_from_env() else {
            return Settings::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => {
                info!(target: "settings", "Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                let settings = Settings::default();
                if let Err(err) = settings.save_to(&path) {
                    warn!(target: "settings", "Could not write {}: {}", path.display(), err);
                }
                settings
            }
            Err(err) => {
                warn!(target: "settings", "Ignoring {}: {}", path.display(), err);
                Settings::default()
            }
        }
    }

    pub fn path_from_env() -> Option<PathBuf> {
        std::env::var_os(SETTINGS_PATH_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                self.version = SETTINGS_VERSION;
            }
            _ => (),
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    /// `SEED=<u64>` makes secret draws reproducible. Unparseable values are ignored.
    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.trim().parse::<u64>().ok())
    }
}
