//! Level progression: disk counts per level, unlocking and completion.
//!
//! Levels are numbered from 1. Level `n` uses `min_disks + n - 1` disks, so
//! the default configuration (3 disks, 8 levels) spans 3 to 10 disks.
//! Level `n + 1` unlocks once level `n` is completed.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Largest disk count any configuration may reach.
pub const MAX_DISKS: u8 = 20;

/// Errors from level configuration and level selection.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LevelError {
    /// The configured bounds are unusable.
    #[display("Invalid level configuration: {}", _0)]
    InvalidConfig(String),
    /// The level number is outside 1..=max_level.
    #[display("Level {} does not exist", _0)]
    OutOfRange(u8),
    /// The level has not been unlocked yet.
    #[display("Level {} is locked", _0)]
    Locked(u8),
    /// Player names must not be blank.
    #[display("Player name must not be empty")]
    EmptyPlayerName,
}

impl std::error::Error for LevelError {}

/// A playable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct Level {
    /// Level number, starting at 1.
    number: u8,
    /// Disks on the left tower at the start.
    disk_count: u8,
}

impl Level {
    /// Minimum moves needed to solve this level.
    pub fn optimal_moves(&self) -> u64 {
        super::rules::optimal_moves(self.disk_count)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level {} ({} disks)", self.number, self.disk_count)
    }
}

/// Level bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Disks on level 1.
    min_disks: u8,
    /// Number of levels.
    max_level: u8,
}

impl LevelConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::InvalidConfig`] if either bound is zero or the
    /// last level would exceed [`MAX_DISKS`].
    #[instrument]
    pub fn new(min_disks: u8, max_level: u8) -> Result<Self, LevelError> {
        if min_disks == 0 {
            return Err(LevelError::InvalidConfig(
                "min_disks must be at least 1".to_string(),
            ));
        }
        if max_level == 0 {
            return Err(LevelError::InvalidConfig(
                "max_level must be at least 1".to_string(),
            ));
        }
        let top = u16::from(min_disks) + u16::from(max_level) - 1;
        if top > u16::from(MAX_DISKS) {
            return Err(LevelError::InvalidConfig(format!(
                "last level would need {} disks (max {})",
                top, MAX_DISKS
            )));
        }
        Ok(Self {
            min_disks,
            max_level,
        })
    }

    /// Disk count for a level, or `None` outside 1..=max_level.
    pub fn disk_count_for_level(&self, number: u8) -> Option<u8> {
        if (1..=self.max_level).contains(&number) {
            Some(self.min_disks + number - 1)
        } else {
            None
        }
    }

    /// Looks up a level by number.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::OutOfRange`] outside 1..=max_level.
    pub fn level(&self, number: u8) -> Result<Level, LevelError> {
        self.disk_count_for_level(number)
            .map(|disk_count| Level { number, disk_count })
            .ok_or(LevelError::OutOfRange(number))
    }

    /// All levels in order.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        (1..=self.max_level).map(move |number| Level {
            number,
            disk_count: self.min_disks + number - 1,
        })
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            min_disks: 3,
            max_level: 8,
        }
    }
}

fn default_level() -> u8 {
    1
}

fn default_sound() -> bool {
    true
}

/// A player's saved progress.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    /// Display name (non-empty).
    name: String,
    /// Levels solved at least once.
    #[serde(default)]
    completed_levels: BTreeSet<u8>,
    /// Level the player is on.
    #[serde(default = "default_level")]
    current_level: u8,
    /// Highest level reached through sequential completion.
    #[serde(default = "default_level")]
    highest_level: u8,
    /// Whether sound effects are on.
    #[serde(default = "default_sound")]
    sound_enabled: bool,
}

impl PlayerProgress {
    /// Creates a fresh player at level 1.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::EmptyPlayerName`] if `name` is blank.
    #[instrument(skip(name), fields(name = %name))]
    pub fn new(name: String) -> Result<Self, LevelError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(LevelError::EmptyPlayerName);
        }
        Ok(Self {
            name,
            completed_levels: BTreeSet::new(),
            current_level: default_level(),
            highest_level: default_level(),
            sound_enabled: default_sound(),
        })
    }

    /// Returns true if the player has solved `level`.
    pub fn has_completed(&self, level: u8) -> bool {
        self.completed_levels.contains(&level)
    }

    /// Flips the sound preference and returns the new value.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }
}

/// Applies the progression rules for one level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct LevelManager {
    config: LevelConfig,
}

impl LevelManager {
    /// Creates a manager over the given bounds.
    pub fn new(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Disk count for a level, or `None` outside the configured range.
    pub fn disk_count_for_level(&self, number: u8) -> Option<u8> {
        self.config.disk_count_for_level(number)
    }

    /// Level 1 is always open; level `n` opens once `n - 1` is completed.
    pub fn is_unlocked(&self, player: &PlayerProgress, level: u8) -> bool {
        if self.config.disk_count_for_level(level).is_none() {
            return false;
        }
        level == 1 || player.has_completed(level - 1)
    }

    /// Moves the player's current level up by one; no-op at the last level.
    ///
    /// Returns true if the level changed.
    #[instrument(skip(self, player), fields(player = %player.name, level = player.current_level))]
    pub fn advance(&self, player: &mut PlayerProgress) -> bool {
        if player.current_level >= *self.config.max_level() {
            debug!("Already at last level");
            return false;
        }
        player.current_level += 1;
        true
    }

    /// Moves the player's current level down by one; no-op at level 1.
    ///
    /// Returns true if the level changed.
    #[instrument(skip(self, player), fields(player = %player.name, level = player.current_level))]
    pub fn retreat(&self, player: &mut PlayerProgress) -> bool {
        if player.current_level <= 1 {
            debug!("Already at first level");
            return false;
        }
        player.current_level -= 1;
        true
    }

    /// Jumps to any unlocked level.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::OutOfRange`] or [`LevelError::Locked`].
    #[instrument(skip(self, player), fields(player = %player.name))]
    pub fn select_level(&self, player: &mut PlayerProgress, level: u8) -> Result<Level, LevelError> {
        let selected = self.config.level(level)?;
        if !self.is_unlocked(player, level) {
            warn!(level, "Level is locked");
            return Err(LevelError::Locked(level));
        }
        player.current_level = level;
        Ok(selected)
    }

    /// Records a solved level.
    ///
    /// Idempotent. Completing the player's highest level opens the next one
    /// unless it is the last. Returns true if the level was newly completed.
    #[instrument(skip(self, player), fields(player = %player.name))]
    pub fn mark_completed(&self, player: &mut PlayerProgress, level: u8) -> bool {
        if self.config.disk_count_for_level(level).is_none() {
            warn!(level, "Ignoring completion of unknown level");
            return false;
        }
        if !player.completed_levels.insert(level) {
            debug!(level, "Level already completed");
            return false;
        }
        if level == player.highest_level && player.highest_level < *self.config.max_level() {
            player.highest_level += 1;
        }
        info!(level, highest = player.highest_level, "Level completed");
        true
    }

    /// Returns true once the player has solved every level.
    pub fn all_completed(&self, player: &PlayerProgress) -> bool {
        self.config
            .levels()
            .all(|level| player.has_completed(level.number))
    }

    /// Pulls a saved current level back into the configured range.
    ///
    /// Records written under a different configuration can point past the
    /// last level (or at level 0). Returns the level the player is now on.
    #[instrument(skip(self, player), fields(player = %player.name, level = player.current_level))]
    pub fn clamp_current_level(&self, player: &mut PlayerProgress) -> Level {
        let level = self.current_level(player);
        if player.current_level != level.number {
            warn!(clamped = level.number, "Saved level out of range");
            player.current_level = level.number;
        }
        level
    }

    /// Returns the player's current level, clamped into range.
    pub fn current_level(&self, player: &PlayerProgress) -> Level {
        let number = player
            .current_level
            .clamp(1, *self.config.max_level());
        Level {
            number,
            disk_count: self.config.min_disks + number - 1,
        }
    }
}
