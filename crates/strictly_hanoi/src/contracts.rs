//! Contract-based validation for disk moves.
//!
//! Contracts formalise Hoare-style reasoning: {P} action {Q}. The
//! precondition is the move rule; the postcondition is the invariant set.

use super::invariants::{HanoiInvariants, InvariantSet};
use super::rules::check_move;
use super::{HanoiEngine, Move, MoveError, RejectReason};
use tracing::instrument;

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Error reported when the precondition fails.
    type Rejection;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), Self::Rejection>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

/// Contract for disk moves.
///
/// Preconditions:
/// - the move obeys the stacking rule
///
/// Postconditions:
/// - stacking order, disk conservation and history consistency hold
/// - exactly one move was added
pub struct MoveContract;

impl Contract<HanoiEngine, Move> for MoveContract {
    type Rejection = RejectReason;

    #[instrument(skip(game))]
    fn pre(game: &HanoiEngine, action: &Move) -> Result<(), RejectReason> {
        check_move(action.disk, action.from, action.to, game.towers())
    }

    fn post(before: &HanoiEngine, after: &HanoiEngine) -> Result<(), MoveError> {
        if after.history().len() != before.history().len() + 1 {
            return Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: history grew from {} to {}",
                before.history().len(),
                after.history().len()
            )));
        }

        HanoiInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
