//! First-class invariants for the Tower of Hanoi.
//!
//! Invariants are logical properties that must hold throughout a level
//! session. They are checked after every accepted move in debug builds and
//! are testable on their own.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// The description of an invariant that failed to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{}", _0)]
pub struct InvariantViolation(pub &'static str);

/// Invariants checked together as one tuple.
pub trait InvariantSet<S> {
    /// Checks every member, collecting all that fail.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($member:ident),+) => {
        impl<S, $($member),+> InvariantSet<S> for ($($member,)+)
        where
            $($member: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let violations: Vec<InvariantViolation> = [
                    $((
                        <$member as Invariant<S>>::holds(state),
                        <$member as Invariant<S>>::description(),
                    ),)+
                ]
                .into_iter()
                .filter(|(holds, _)| !holds)
                .map(|(_, description)| InvariantViolation(description))
                .collect();

                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(A, B);
impl_invariant_set!(A, B, C);

pub mod disk_conservation;
pub mod history_consistent;
pub mod stacking_order;

pub use disk_conservation::DiskConservationInvariant;
pub use history_consistent::HistoryConsistentInvariant;
pub use stacking_order::StackingOrderInvariant;

/// All Tower of Hanoi invariants as a composable set.
pub type HanoiInvariants = (
    StackingOrderInvariant,
    DiskConservationInvariant,
    HistoryConsistentInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Disk, HanoiEngine, LevelConfig, TowerId};

    fn engine() -> HanoiEngine {
        HanoiEngine::new(LevelConfig::default().level(1).unwrap())
    }

    #[test]
    fn test_invariant_set_holds_for_fresh_level() {
        assert!(HanoiInvariants::check_all(&engine()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut game = engine();
        game.move_disk(TowerId::Left, TowerId::Right).unwrap();
        game.move_disk(TowerId::Left, TowerId::Middle).unwrap();
        assert!(HanoiInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut game = engine();
        // Drop a large disk onto the small one behind the engine's back.
        game.towers.push(TowerId::Left, Disk::new(3));

        let violations = HanoiInvariants::check_all(&game).unwrap_err();
        assert!(violations.len() >= 2);
        assert!(violations.contains(&InvariantViolation(
            DiskConservationInvariant::description()
        )));
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (StackingOrderInvariant, DiskConservationInvariant);
        assert!(TwoInvariants::check_all(&engine()).is_ok());
    }
}
