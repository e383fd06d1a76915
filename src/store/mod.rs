//! Persistence layer for player progress, the leaderboard and preferences.

mod error;
mod kv;
mod progress;

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use progress::{
    LEADERBOARD_KEY, PLAYERS_KEY, ProgressStore, SAVE_KEY_PREFIX, THEME_KEY, Theme, player_key,
};
