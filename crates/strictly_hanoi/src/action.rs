//! First-class action types for the Tower of Hanoi.
//!
//! Moves are domain events, not side effects. They are validated before
//! application, recorded for undo and replay, and reported to the host.

use super::{Disk, TowerId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A disk moved from one tower to another.
///
/// Immutable once recorded in the move history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Tower the disk was taken from.
    pub from: TowerId,
    /// Tower the disk was placed on.
    pub to: TowerId,
    /// The disk that moved.
    pub disk: Disk,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(from: TowerId, to: TowerId, disk: Disk) -> Self {
        Self { from, to, disk }
    }

    /// Returns the same disk travelling the opposite way.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            disk: self.disk,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "disk {}: {} -> {}",
            self.disk,
            self.from.index(),
            self.to.index()
        )
    }
}

/// Why a proposed move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RejectReason {
    /// Source and target are the same tower.
    #[display("Source and target are the same tower")]
    SameTower,
    /// The source tower has no disks.
    #[display("Tower {} has no disks", _0)]
    EmptySource(TowerId),
    /// The disk is not the topmost disk of the source tower.
    #[display("Disk {} is not on top of its tower", _0)]
    NotTopDisk(Disk),
    /// The disk is larger than the disk it would rest on.
    #[display("Disk {} cannot rest on smaller disk {}", disk, target_top)]
    LargerOnSmaller {
        /// Disk being moved.
        disk: Disk,
        /// Top disk of the target tower.
        target_top: Disk,
    },
    /// No disk is selected.
    #[display("No disk selected")]
    NoSelection,
}

/// Outcome of a move attempt, reported to the host instead of an error so
/// the presentation layer can animate feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// The move that was applied, if accepted.
    pub applied: Option<Move>,
    /// Why the move was rejected, if it was.
    pub reason: Option<RejectReason>,
}

impl MoveResult {
    /// An accepted move.
    pub fn accepted(mv: Move) -> Self {
        Self {
            applied: Some(mv),
            reason: None,
        }
    }

    /// A rejected move.
    pub fn rejected(reason: RejectReason) -> Self {
        Self {
            applied: None,
            reason: Some(reason),
        }
    }

    /// Returns true if the move was applied.
    pub fn is_accepted(&self) -> bool {
        self.applied.is_some()
    }
}

/// Error returned by engine operations that cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Selecting from a tower with no disks.
    #[display("Tower {} is empty", _0)]
    EmptyTower(TowerId),

    /// Undo with nothing to undo.
    #[display("No moves to undo")]
    EmptyHistory,

    /// The level is won; the engine is frozen until re-initialised.
    #[display("Level is already complete")]
    LevelComplete,

    /// A replayed move broke the rules.
    #[display("Illegal move {}: {}", _0, _1)]
    IllegalMove(Move, RejectReason),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
