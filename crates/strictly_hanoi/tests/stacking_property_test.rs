//! Property tests: no sequence of attempted moves can break the towers.

use proptest::prelude::*;
use strictly_hanoi::{
    HanoiEngine, HanoiInvariants, InvariantSet, LevelConfig, MoveError, TowerId,
};

/// Strategy for a tower index pair, including same-tower attempts.
fn attempt_strategy() -> impl Strategy<Value = (usize, usize)> {
    (0usize..3, 0usize..3)
}

proptest! {
    /// Any mix of attempts, accepted or not, keeps every invariant.
    #[test]
    fn invariants_hold_for_arbitrary_attempts(
        level in 1u8..=3,
        attempts in prop::collection::vec(attempt_strategy(), 0..200),
    ) {
        let level = LevelConfig::default().level(level).unwrap();
        let mut game = HanoiEngine::new(level);

        for (from, to) in attempts {
            let from = TowerId::from_index(from).unwrap();
            let to = TowerId::from_index(to).unwrap();
            match game.move_disk(from, to) {
                Ok(_) => {}
                Err(MoveError::LevelComplete) => break,
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
            prop_assert!(HanoiInvariants::check_all(&game).is_ok());
        }

        prop_assert_eq!(game.history().len() as u32, game.move_count());
        prop_assert_eq!(game.towers().total_disks(), *level.disk_count() as usize);
    }

    /// Undo after any accepted sequence restores the previous towers.
    #[test]
    fn undo_reverses_the_last_move(
        attempts in prop::collection::vec(attempt_strategy(), 1..60),
    ) {
        let mut game = HanoiEngine::new(LevelConfig::default().level(3).unwrap());
        for (from, to) in attempts {
            if game.is_won() {
                break;
            }
            let before = game.towers().clone();
            let result = game
                .move_disk(TowerId::from_index(from).unwrap(), TowerId::from_index(to).unwrap())
                .unwrap();
            if result.is_accepted() && !game.is_won() {
                game.undo().unwrap();
                prop_assert_eq!(game.towers(), &before);
                game.move_disk(
                    TowerId::from_index(from).unwrap(),
                    TowerId::from_index(to).unwrap(),
                )
                .unwrap();
            }
        }
    }

    /// Efficiency never exceeds 100 and is 100 only at or below optimal.
    #[test]
    fn efficiency_is_bounded(disks in 1u8..=20, moves in 1u32..100_000) {
        let eff = strictly_hanoi::rules::efficiency(disks, moves);
        prop_assert!(eff <= 100);
        if u64::from(moves) > strictly_hanoi::rules::optimal_moves(disks) {
            prop_assert!(eff < 100);
        }
    }
}
