//! Session phases and the statistics reported when a level is won.

use super::Level;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Phase of a level session.
///
/// `Idle` until the first accepted move, `InProgress` while playing,
/// `Won` once every disk rests on the right tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No move made yet; the host clock is not running.
    #[default]
    Idle,
    /// At least one move made.
    InProgress,
    /// Level solved; the engine accepts no further mutation.
    Won,
}

impl GamePhase {
    /// Returns true once the level is solved.
    pub fn is_won(self) -> bool {
        matches!(self, GamePhase::Won)
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Idle => write!(f, "Idle"),
            GamePhase::InProgress => write!(f, "In progress"),
            GamePhase::Won => write!(f, "Won"),
        }
    }
}

/// Result of a solved level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct LevelStats {
    /// The level that was solved.
    level: Level,
    /// Moves taken.
    moves: u32,
    /// Time on the host clock when the level was solved.
    elapsed: Duration,
    /// Minimum possible moves for this level.
    optimal_moves: u64,
    /// Percentage of optimal play (0-100).
    efficiency: u8,
}

impl LevelStats {
    /// Computes stats for a solved level.
    pub fn new(level: Level, moves: u32, elapsed: Duration) -> Self {
        Self {
            level,
            moves,
            elapsed,
            optimal_moves: super::rules::optimal_moves(*level.disk_count()),
            efficiency: super::rules::efficiency(*level.disk_count(), moves),
        }
    }

    /// Whole seconds elapsed, as recorded on the leaderboard.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }

    /// Returns true if the level was solved in the minimum number of moves.
    pub fn is_optimal(&self) -> bool {
        u64::from(self.moves) == self.optimal_moves
    }
}

/// Formats whole seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours: an hour and a half reads `90:00`.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
