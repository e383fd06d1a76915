//! Stacking order invariant: no disk rests on a smaller one.

use super::super::{HanoiEngine, TowerId};
use super::Invariant;
use strum::IntoEnumIterator;

/// Invariant: on every tower, disk sizes strictly decrease bottom to top.
pub struct StackingOrderInvariant;

impl Invariant<HanoiEngine> for StackingOrderInvariant {
    fn holds(game: &HanoiEngine) -> bool {
        TowerId::iter().all(|id| {
            game.towers()
                .tower(id)
                .windows(2)
                .all(|pair| pair[0] > pair[1])
        })
    }

    fn description() -> &'static str {
        "Disk sizes strictly decrease from bottom to top on every tower"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Disk, LevelConfig};

    #[test]
    fn test_fresh_level_holds() {
        let game = HanoiEngine::new(LevelConfig::default().level(3).unwrap());
        assert!(StackingOrderInvariant::holds(&game));
    }

    #[test]
    fn test_rejected_moves_keep_order() {
        let mut game = HanoiEngine::new(LevelConfig::default().level(1).unwrap());
        game.move_disk(TowerId::Left, TowerId::Right).unwrap();
        let result = game.move_disk(TowerId::Left, TowerId::Right).unwrap();
        assert!(!result.is_accepted());
        assert!(StackingOrderInvariant::holds(&game));
    }

    #[test]
    fn test_corrupted_tower_violates() {
        let mut game = HanoiEngine::new(LevelConfig::default().level(1).unwrap());
        game.towers.push(TowerId::Left, Disk::new(2));
        assert!(!StackingOrderInvariant::holds(&game));
    }
}
