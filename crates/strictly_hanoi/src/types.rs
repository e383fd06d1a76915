//! Core domain types for the Tower of Hanoi: disks, towers and the tower set.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A disk, identified by its size. Smaller value means a smaller disk.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{_0}")]
pub struct Disk(u8);

impl Disk {
    /// Creates a disk of the given size.
    pub fn new(size: u8) -> Self {
        Self(size)
    }

    /// Returns the disk size.
    pub fn size(self) -> u8 {
        self.0
    }
}

/// One of the three towers (pegs).
///
/// Disks start stacked on [`TowerId::Left`]; the level is won once they
/// all rest on [`TowerId::Right`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
pub enum TowerId {
    /// Starting tower (index 0).
    Left,
    /// Spare tower (index 1).
    Middle,
    /// Terminal tower (index 2).
    Right,
}

impl TowerId {
    /// All towers in index order.
    pub const ALL: [TowerId; 3] = [TowerId::Left, TowerId::Middle, TowerId::Right];

    /// Converts a raw index (0-2) into a tower.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the raw index (0-2).
    pub fn index(self) -> usize {
        match self {
            TowerId::Left => 0,
            TowerId::Middle => 1,
            TowerId::Right => 2,
        }
    }

    /// Returns a short display label.
    pub fn label(self) -> &'static str {
        match self {
            TowerId::Left => "Left",
            TowerId::Middle => "Middle",
            TowerId::Right => "Right",
        }
    }
}

impl std::fmt::Display for TowerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.index())
    }
}

/// Error raised by the tower container itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TowerError {
    /// Pop was called on a tower with no disks.
    #[display("Tower {} is empty", _0)]
    Empty(TowerId),
}

impl std::error::Error for TowerError {}

/// The three towers, bottom of each stack first.
///
/// This is a plain container. It does not check stacking order on `push`;
/// the rules module decides which moves reach it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Towers {
    stacks: [Vec<Disk>; 3],
}

impl Towers {
    /// Creates empty towers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the starting position: `disk_count` disks on the left tower,
    /// largest at the bottom.
    #[instrument]
    pub fn stacked(disk_count: u8) -> Self {
        let mut towers = Self::new();
        towers.stacks[TowerId::Left.index()] = (1..=disk_count).rev().map(Disk::new).collect();
        towers
    }

    /// Returns the topmost disk of a tower, if any.
    pub fn top_disk(&self, tower: TowerId) -> Option<Disk> {
        self.stacks[tower.index()].last().copied()
    }

    /// Places a disk on top of a tower.
    pub fn push(&mut self, tower: TowerId, disk: Disk) {
        self.stacks[tower.index()].push(disk);
    }

    /// Removes the topmost disk of a tower.
    ///
    /// # Errors
    ///
    /// Returns [`TowerError::Empty`] if the tower holds no disks.
    pub fn pop(&mut self, tower: TowerId) -> Result<Disk, TowerError> {
        self.stacks[tower.index()]
            .pop()
            .ok_or(TowerError::Empty(tower))
    }

    /// Returns the disks of a tower, bottom first.
    pub fn tower(&self, tower: TowerId) -> &[Disk] {
        &self.stacks[tower.index()]
    }

    /// Returns the number of disks on a tower.
    pub fn len(&self, tower: TowerId) -> usize {
        self.stacks[tower.index()].len()
    }

    /// Checks whether a tower holds no disks.
    pub fn is_empty(&self, tower: TowerId) -> bool {
        self.stacks[tower.index()].is_empty()
    }

    /// Total number of disks across all towers.
    pub fn total_disks(&self) -> usize {
        self.stacks.iter().map(Vec::len).sum()
    }

    /// Formats the towers as one line per tower, e.g. `0 | 3 2 1`.
    pub fn display(&self) -> String {
        TowerId::ALL
            .iter()
            .map(|&id| {
                let disks = self
                    .tower(id)
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{} | {}", id.index(), disks)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
