//! Win detection and scoring arithmetic.

use super::super::{TowerId, Towers};
use tracing::instrument;

/// Checks whether every disk rests on the terminal (right) tower.
///
/// Ordering is implied: the position is only reachable through legal moves.
#[instrument(skip(towers))]
pub fn is_solved(towers: &Towers, disk_count: u8) -> bool {
    towers.len(TowerId::Right) == usize::from(disk_count)
}

/// Minimum number of moves for `disk_count` disks: `2^n - 1`.
pub fn optimal_moves(disk_count: u8) -> u64 {
    2u64.saturating_pow(u32::from(disk_count)).saturating_sub(1)
}

/// Percentage of optimal play, `floor(optimal * 100 / moves)` clamped to 100.
///
/// Zero moves yields 0.
pub fn efficiency(disk_count: u8, moves: u32) -> u8 {
    if moves == 0 {
        return 0;
    }
    let ratio = optimal_moves(disk_count).saturating_mul(100) / u64::from(moves);
    u8::try_from(ratio.min(100)).unwrap_or(100)
}
