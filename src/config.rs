//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strictly_hanoi::{LevelConfig, LevelManager};
use tracing::{debug, info, instrument};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "HANOI_DATA_DIR";

/// Level bounds, leaderboard size and where saves live.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Disks on level 1.
    #[serde(default = "default_min_disks")]
    min_disks: u8,

    /// Number of levels.
    #[serde(default = "default_max_level")]
    max_level: u8,

    /// Entries kept per level on the leaderboard.
    #[serde(default = "default_leaderboard_capacity")]
    leaderboard_capacity: usize,

    /// Directory for saved progress.
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
}

fn default_min_disks() -> u8 {
    3
}

fn default_max_level() -> u8 {
    8
}

fn default_leaderboard_capacity() -> usize {
    strictly_hanoi::LEADERBOARD_CAPACITY
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".hanoi")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_disks: default_min_disks(),
            max_level: default_max_level(),
            leaderboard_capacity: default_leaderboard_capacity(),
            data_dir: default_data_dir(),
        }
    }
}

impl GameConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or the
    /// values are out of range.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            min_disks = config.min_disks,
            max_level = config.max_level,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML or out-of-range values.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every bound.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaderboard_capacity == 0 {
            return Err(ConfigError::new(
                "leaderboard_capacity must be at least 1".to_string(),
            ));
        }
        self.level_config().map(|_| ())
    }

    /// Level bounds as the game logic sees them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the bounds are unusable.
    pub fn level_config(&self) -> Result<LevelConfig, ConfigError> {
        LevelConfig::new(self.min_disks, self.max_level)
            .map_err(|e| ConfigError::new(e.to_string()))
    }

    /// Level manager over these bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the bounds are unusable.
    pub fn level_manager(&self) -> Result<LevelManager, ConfigError> {
        self.level_config().map(LevelManager::new)
    }

    /// Replaces the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Applies `HANOI_DATA_DIR` if it is set and non-empty.
    #[instrument(skip(self))]
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => {
                debug!(dir = %dir, "Data directory overridden by environment");
                self.with_data_dir(dir)
            }
            _ => self,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
