use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ANNOUNCEMENT_COOLDOWN_MS,
    DEFAULT_SESSION_DURATION_MS, DEFAULT_SMILE_THRESHOLD, DEFAULT_TARGET_BOX_RATIO,
    DEFAULT_TICK_INTERVAL_MS, MAX_SESSION_DURATION_MS,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("target box ratio must be in (0, 1], got {0}")]
    TargetBoxRatio(f64),
    #[error("smile threshold must be in [0, 1], got {0}")]
    SmileThreshold(f64),
    #[error("session duration must be in (0, {max}] ms, got {0}", max = MAX_SESSION_DURATION_MS)]
    SessionDuration(u64),
    #[error("tick interval must be positive")]
    TickInterval,
}

/// Tunables accepted at setup. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub target_box_ratio: f64,
    pub smile_threshold: f64,
    pub session_duration_ms: u64,
    pub announcement_cooldown_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            target_box_ratio: DEFAULT_TARGET_BOX_RATIO,
            smile_threshold: DEFAULT_SMILE_THRESHOLD,
            session_duration_ms: DEFAULT_SESSION_DURATION_MS,
            announcement_cooldown_ms: DEFAULT_ANNOUNCEMENT_COOLDOWN_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl FeedbackConfig {
    /// Per-user config location, e.g. `~/.config/SmileSession/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads an explicit file, else the per-user file when it exists, else
    /// the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(p) => Self::from_file(&p),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_box_ratio > 0.0 && self.target_box_ratio <= 1.0) {
            return Err(ConfigError::TargetBoxRatio(self.target_box_ratio));
        }
        if !(0.0..=1.0).contains(&self.smile_threshold) {
            return Err(ConfigError::SmileThreshold(self.smile_threshold));
        }
        if !(1..=MAX_SESSION_DURATION_MS).contains(&self.session_duration_ms) {
            return Err(ConfigError::SessionDuration(self.session_duration_ms));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::TickInterval);
        }
        Ok(())
    }
}
