//! Per-level leaderboard.
//!
//! Each level keeps at most one entry per player (their best) and at most
//! [`LEADERBOARD_CAPACITY`] entries overall, ranked by fewest moves and then
//! shortest time. An entry pushed below the cut is dropped; the ledger does
//! not remember personal bests outside the top ranks.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Default number of entries kept per level.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Reasons a score cannot enter the ledger.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LedgerError {
    /// A solved level always takes at least one move.
    #[display("Score for {} has zero moves", _0)]
    ZeroMoves(String),
    /// Scores must name a player.
    #[display("Score has no player name")]
    EmptyPlayerName,
}

impl std::error::Error for LedgerError {}

/// A finished run on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Who played.
    player_name: String,
    /// Moves taken (always > 0 for a solved level).
    moves: u32,
    /// Whole seconds on the clock.
    elapsed_secs: u64,
    /// When the run was recorded.
    recorded_at: DateTime<Utc>,
}

impl ScoreEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(player_name: impl Into<String>, moves: u32, elapsed_secs: u64) -> Self {
        Self::at(player_name, moves, elapsed_secs, Utc::now())
    }

    /// Creates an entry with an explicit timestamp.
    pub fn at(
        player_name: impl Into<String>,
        moves: u32,
        elapsed_secs: u64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            moves,
            elapsed_secs,
            recorded_at,
        }
    }

    /// Ranking order: fewer moves first, then less time.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.moves
            .cmp(&other.moves)
            .then(self.elapsed_secs.cmp(&other.elapsed_secs))
    }

    /// Returns true if this run strictly beats `other`.
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Less
    }
}

/// What happened to a recorded score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOutcome {
    /// First entry for this player on this level.
    Added {
        /// 1-based rank, or `None` if it fell outside the leaderboard.
        rank: Option<usize>,
    },
    /// Beat and replaced the player's previous entry.
    Improved {
        /// 1-based rank, or `None` if it fell outside the leaderboard.
        rank: Option<usize>,
    },
    /// Not better than the player's existing entry; nothing changed.
    NotImproved,
}

impl RecordOutcome {
    /// Returns the rank the entry landed on, if it is on the board.
    pub fn rank(&self) -> Option<usize> {
        match self {
            RecordOutcome::Added { rank } | RecordOutcome::Improved { rank } => *rank,
            RecordOutcome::NotImproved => None,
        }
    }
}

/// Leaderboards for every level, keyed by level number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    levels: BTreeMap<u8, Vec<ScoreEntry>>,
    #[serde(skip, default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    LEADERBOARD_CAPACITY
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreLedger {
    /// Creates an empty ledger with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(LEADERBOARD_CAPACITY)
    }

    /// Creates an empty ledger keeping `capacity` entries per level (min 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            levels: BTreeMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Changes the per-level capacity, truncating existing boards.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        for entries in self.levels.values_mut() {
            entries.truncate(self.capacity);
        }
    }

    /// Entries kept per level.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records a finished run.
    ///
    /// A player's existing entry is replaced only by a strictly better run.
    /// The board is then re-ranked and cut to capacity.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] (ledger unchanged) for a zero-move entry or a
    /// blank player name.
    #[instrument(skip(self, entry), fields(player = %entry.player_name, moves = entry.moves, secs = entry.elapsed_secs))]
    pub fn record_score(
        &mut self,
        level: u8,
        entry: ScoreEntry,
    ) -> Result<RecordOutcome, LedgerError> {
        if entry.player_name.trim().is_empty() {
            warn!("Rejecting score without a player");
            return Err(LedgerError::EmptyPlayerName);
        }
        if entry.moves == 0 {
            warn!("Rejecting zero-move score");
            return Err(LedgerError::ZeroMoves(entry.player_name));
        }

        let entries = self.levels.entry(level).or_default();
        let player = entry.player_name.clone();

        let improved = match entries.iter_mut().find(|e| e.player_name == player) {
            Some(existing) if entry.is_better_than(existing) => {
                *existing = entry;
                true
            }
            Some(_) => {
                debug!("Existing entry is as good or better");
                return Ok(RecordOutcome::NotImproved);
            }
            None => {
                entries.push(entry);
                false
            }
        };

        entries.sort_by(ScoreEntry::rank_cmp);
        entries.truncate(self.capacity);

        let rank = entries
            .iter()
            .position(|e| e.player_name == player)
            .map(|i| i + 1);
        info!(level, ?rank, improved, "Score recorded");

        Ok(if improved {
            RecordOutcome::Improved { rank }
        } else {
            RecordOutcome::Added { rank }
        })
    }

    /// The player's entry on a level, if still on the board.
    pub fn best_score_for(&self, level: u8, player_name: &str) -> Option<&ScoreEntry> {
        self.levels
            .get(&level)?
            .iter()
            .find(|e| e.player_name == player_name)
    }

    /// A level's board, best first.
    pub fn scores_for(&self, level: u8) -> &[ScoreEntry] {
        self.levels.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Levels that have at least one entry.
    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.levels
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(level, _)| *level)
    }

    /// Drops every entry that breaks the board rules.
    ///
    /// Used after loading saved data: removes zero-move entries and
    /// duplicates per player, re-ranks, and cuts to capacity. Returns the
    /// number of entries removed.
    #[instrument(skip(self))]
    pub fn normalize(&mut self) -> usize {
        let mut removed = 0;
        for entries in self.levels.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.moves > 0 && !e.player_name.trim().is_empty());
            entries.sort_by(ScoreEntry::rank_cmp);
            let mut seen = std::collections::HashSet::new();
            entries.retain(|e| seen.insert(e.player_name.clone()));
            entries.truncate(self.capacity);
            removed += before - entries.len();
        }
        self.levels.retain(|_, entries| !entries.is_empty());
        if removed > 0 {
            debug!(removed, "Dropped invalid leaderboard entries");
        }
        removed
    }
}
