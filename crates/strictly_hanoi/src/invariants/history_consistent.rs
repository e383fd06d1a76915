//! History consistency invariant: the recorded moves explain the towers.

use super::super::rules::check_move;
use super::super::{HanoiEngine, Towers};
use super::Invariant;

/// Invariant: replaying the move history from the starting position
/// reproduces the current towers, and the move counter equals its length.
pub struct HistoryConsistentInvariant;

impl Invariant<HanoiEngine> for HistoryConsistentInvariant {
    fn holds(game: &HanoiEngine) -> bool {
        if usize::try_from(game.move_count()).ok() != Some(game.history().len()) {
            return false;
        }

        let mut towers = Towers::stacked(*game.level().disk_count());
        for mv in game.history() {
            if check_move(mv.disk, mv.from, mv.to, &towers).is_err() {
                return false;
            }
            match towers.pop(mv.from) {
                Ok(disk) => towers.push(mv.to, disk),
                Err(_) => return false,
            }
        }

        &towers == game.towers()
    }

    fn description() -> &'static str {
        "Replaying the move history reproduces the towers"
    }
}
