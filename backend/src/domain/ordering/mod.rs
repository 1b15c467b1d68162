//! Fractional-position ordering engine for cards in a board and tasks in a
//! card.

mod position;
mod siblings;

pub use position::{
    APPEND_STEP, FIRST_POSITION, MIN_POSITION_GAP, append_position, compute_position,
    gap_exhausted, needs_rebalance, rebalanced_positions,
};
pub use siblings::{Positioned, SiblingScope};
