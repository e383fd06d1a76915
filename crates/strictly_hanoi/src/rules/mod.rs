//! Game rules for the Tower of Hanoi.
//!
//! Pure functions over [`Towers`](crate::Towers). Rules are kept apart from
//! tower storage so contracts and the engine can compose them.

pub mod validate;
pub mod win;

pub use validate::{check_move, is_valid_move};
pub use win::{efficiency, is_solved, optimal_moves};
