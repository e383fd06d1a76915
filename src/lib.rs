//! Hanoi Game library - the host around the `strictly_hanoi` engine.
//!
//! # Architecture
//!
//! - **Config**: TOML game settings
//! - **Store**: key-value persistence for players, leaderboard and preferences
//! - **Profiles**: get-or-create players, recording wins
//! - **Session**: one player playing one level at a time
//! - **Console**: line-based play in a terminal
//!
//! # Example
//!
//! ```
//! use hanoi_game::{GameSession, MemoryStore, ProfileService, ProgressStore};
//! use strictly_hanoi::{LevelManager, TowerId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let profiles = ProfileService::new(ProgressStore::new(MemoryStore::new()), LevelManager::default());
//! let mut session = GameSession::start(profiles, "Alice")?;
//! session.move_disk(TowerId::Left, TowerId::Right)?;
//! assert_eq!(session.engine().move_count(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod console;
mod profile_service;
mod session;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, DATA_DIR_ENV, GameConfig};

// Crate-level exports - Console host
pub use console::{Console, ConsoleCommand, ParseCommandError};

// Crate-level exports - Profiles
pub use profile_service::{LevelSummary, ProfileError, ProfileService, WinRecord};

// Crate-level exports - Session
pub use session::{GameSession, SessionError};

// Crate-level exports - Persistence
pub use store::{
    FileStore, KeyValueStore, LEADERBOARD_KEY, MemoryStore, PLAYERS_KEY, ProgressStore,
    SAVE_KEY_PREFIX, StoreError, THEME_KEY, Theme, player_key,
};
