//! Notifications the engine queues for its host.
//!
//! The engine never calls out. Every operation appends to a queue that the
//! host drains after the call and renders in response.

use super::{Disk, Level, LevelStats, Move, RejectReason, TowerId};
use serde::{Deserialize, Serialize};

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A level was (re)initialised and the towers reset.
    LevelInitialized(Level),
    /// The top disk of a tower was picked up.
    DiskSelected {
        /// Tower the disk sits on.
        tower: TowerId,
        /// The selected disk.
        disk: Disk,
    },
    /// The selection was dropped without moving.
    SelectionCleared,
    /// A move was applied.
    DiskMoved(Move),
    /// A move was reverted by undo.
    MoveUndone(Move),
    /// A move was refused.
    InvalidMoveAttempted(RejectReason),
    /// First move of the level; the host should start its clock.
    TimerStarted,
    /// The level was solved; the host should stop its clock.
    LevelWon(LevelStats),
}
