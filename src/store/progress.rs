//! Player records, the leaderboard and preferences over a [`KeyValueStore`].
//!
//! Malformed saved data never stops the game: it is logged and replaced by
//! the default state for that key.

use crate::store::{KeyValueStore, StoreError};
use derive_more::Display;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strictly_hanoi::{LEADERBOARD_CAPACITY, PlayerProgress, ScoreLedger};
use tracing::{debug, info, instrument, warn};

/// Prefix of per-player save keys.
pub const SAVE_KEY_PREFIX: &str = "tower_of_hanoi_save_";
/// Key of the known player names.
pub const PLAYERS_KEY: &str = "tower_of_hanoi_players";
/// Key of the shared leaderboard.
pub const LEADERBOARD_KEY: &str = "tower_of_hanoi_leaderboard";
/// Key of the theme preference.
pub const THEME_KEY: &str = "tower_of_hanoi_theme";

/// Save key for a player: lowercase, whitespace runs become `_`.
///
/// Characters that are not file-safe are written as `-<hex>`.
pub fn player_key(name: &str) -> String {
    let mut key = String::from(SAVE_KEY_PREFIX);
    let mut in_space = false;
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            if !in_space {
                key.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            key.push(c);
        } else {
            key.push_str(&format!("-{:x}", u32::from(c)));
        }
    }
    key
}

/// Colour theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background.
    #[default]
    #[display("dark")]
    Dark,
    /// Light background.
    #[display("light")]
    Light,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Typed access to saved game state.
#[derive(Debug, Clone)]
pub struct ProgressStore<S> {
    backend: S,
    leaderboard_capacity: usize,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Wraps a backend, keeping the default number of leaderboard entries.
    pub fn new(backend: S) -> Self {
        Self::with_capacity(backend, LEADERBOARD_CAPACITY)
    }

    /// Wraps a backend with a custom leaderboard size.
    pub fn with_capacity(backend: S, leaderboard_capacity: usize) -> Self {
        Self {
            backend,
            leaderboard_capacity: leaderboard_capacity.max(1),
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Loads a player's record.
    ///
    /// Returns `Ok(None)` for an unknown player. A corrupted record, or one
    /// whose name is blank or belongs to another key, comes back as a fresh
    /// player with the requested name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails or the name is blank.
    #[instrument(skip(self))]
    pub fn load_player(&self, name: &str) -> Result<Option<PlayerProgress>, StoreError> {
        let key = player_key(name);
        let Some(raw) = self.backend.get(&key)? else {
            debug!("No saved record");
            return Ok(None);
        };

        match serde_json::from_str::<PlayerProgress>(&raw) {
            Ok(player) if !player.name().trim().is_empty() && player_key(player.name()) == key => {
                debug!(level = player.current_level(), "Player loaded");
                return Ok(Some(player));
            }
            Ok(player) => {
                warn!(key = %key, stored = %player.name(), "Player record has the wrong name, starting fresh");
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Corrupted player record, starting fresh");
            }
        }
        PlayerProgress::new(name.to_string())
            .map(Some)
            .map_err(|e| StoreError::new(e.to_string()))
    }

    /// Saves a player's record and adds them to the players list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    #[instrument(skip(self, player), fields(player = %player.name()))]
    pub fn save_player(&mut self, player: &PlayerProgress) -> Result<(), StoreError> {
        let key = player_key(player.name());
        let json = serde_json::to_string(player)?;
        self.backend.set(&key, json)?;

        let mut players = self.list_players()?;
        if !players.iter().any(|p| player_key(p) == key) {
            players.push(player.name().clone());
            self.backend
                .set(PLAYERS_KEY, serde_json::to_string(&players)?)?;
            info!(count = players.len(), "Player added to list");
        }
        debug!("Player saved");
        Ok(())
    }

    /// Names of every saved player, in order of first save.
    ///
    /// Names that map to the same save key are listed once.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    #[instrument(skip(self))]
    pub fn list_players(&self) -> Result<Vec<String>, StoreError> {
        self.load_or_default(PLAYERS_KEY)
    }

    /// Loads the leaderboard, dropping entries that break its rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    #[instrument(skip(self))]
    pub fn load_ledger(&self) -> Result<ScoreLedger, StoreError> {
        let mut ledger: ScoreLedger = self.load_or_default(LEADERBOARD_KEY)?;
        ledger.set_capacity(self.leaderboard_capacity);
        ledger.normalize();
        Ok(ledger)
    }

    /// Saves the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    #[instrument(skip(self, ledger))]
    pub fn save_ledger(&mut self, ledger: &ScoreLedger) -> Result<(), StoreError> {
        self.backend
            .set(LEADERBOARD_KEY, serde_json::to_string(ledger)?)?;
        debug!("Leaderboard saved");
        Ok(())
    }

    /// Loads the theme preference.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    #[instrument(skip(self))]
    pub fn theme(&self) -> Result<Theme, StoreError> {
        self.load_or_default(THEME_KEY)
    }

    /// Saves the theme preference.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    #[instrument(skip(self))]
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.backend.set(THEME_KEY, serde_json::to_string(&theme)?)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "Corrupted saved value, using default");
                Ok(T::default())
            }
        }
    }
}
