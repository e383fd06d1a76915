//! Strictly Hanoi - a type-safe Tower of Hanoi engine.
//!
//! # Architecture
//!
//! - **Types**: disks, towers and moves
//! - **Rules**: pure move validation and win detection
//! - **Invariants / Contracts**: properties checked around every move
//! - **Engine**: one level session, emitting [`GameEvent`]s for the host
//! - **Levels**: level-to-disk mapping, unlocking and player progress
//! - **Ledger**: per-level leaderboards
//!
//! # Example
//!
//! ```
//! use strictly_hanoi::{HanoiEngine, LevelConfig, TowerId};
//!
//! let level = LevelConfig::default().level(1)?;
//! let mut game = HanoiEngine::new(level);
//! let result = game.move_disk(TowerId::Left, TowerId::Right)?;
//! assert!(result.is_accepted());
//! assert_eq!(game.move_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
pub mod contracts;
mod engine;
mod events;
pub mod invariants;
mod ledger;
mod levels;
mod phases;
pub mod rules;
mod types;

pub use action::{Move, MoveError, MoveResult, RejectReason};
pub use contracts::{Contract, MoveContract};
pub use engine::HanoiEngine;
pub use events::GameEvent;
pub use invariants::{
    HanoiInvariants, Invariant, InvariantSet, InvariantViolation,
    disk_conservation::DiskConservationInvariant,
    history_consistent::HistoryConsistentInvariant, stacking_order::StackingOrderInvariant,
};
pub use ledger::{LEADERBOARD_CAPACITY, LedgerError, RecordOutcome, ScoreEntry, ScoreLedger};
pub use levels::{Level, LevelConfig, LevelError, LevelManager, MAX_DISKS, PlayerProgress};
pub use phases::{GamePhase, LevelStats, format_elapsed};
pub use types::{Disk, TowerError, TowerId, Towers};
