//! Fractional position allocation.
//!
//! Positions are `f64` sort keys compared only within one sibling scope. A
//! move writes a single fresh value between its new neighbours; the scope is
//! renumbered only when that gap has collapsed.

/// Position given to the first member of an empty scope.
pub const FIRST_POSITION: f64 = 1.0;

/// Distance between first and last slot when appending.
pub const APPEND_STEP: f64 = 1.0;

/// Smallest gap between neighbours that still leaves room for a midpoint.
pub const MIN_POSITION_GAP: f64 = 1e-9;

/// Position for an item inserted at `index` among `siblings`.
///
/// `siblings` are the positions of every other member of the scope in
/// ascending order. `index` is clamped to `0..=siblings.len()`.
///
/// - empty scope: [`FIRST_POSITION`]
/// - before the first sibling: half of its position
/// - between two siblings: their arithmetic mean
/// - after the last sibling: its position plus [`APPEND_STEP`]
///
/// # Examples
/// ```
/// use taskboard::domain::ordering::compute_position;
///
/// assert_eq!(compute_position(&[], 0), 1.0);
/// assert_eq!(compute_position(&[1.0], 0), 0.5);
/// assert_eq!(compute_position(&[1.0, 3.0], 1), 2.0);
/// assert_eq!(compute_position(&[1.0, 3.0], 9), 4.0);
/// ```
#[must_use]
pub fn compute_position(siblings: &[f64], index: usize) -> f64 {
    let slot = index.min(siblings.len());
    let before = slot.checked_sub(1).and_then(|prev| siblings.get(prev)).copied();
    let after = siblings.get(slot).copied();

    match (before, after) {
        (None, None) => FIRST_POSITION,
        (None, Some(next)) => next / 2.0,
        (Some(prev), Some(next)) => (prev + next) / 2.0,
        (Some(prev), None) => prev + APPEND_STEP,
    }
}

/// Position one step past the largest of `positions`, or
/// [`FIRST_POSITION`] when there are none.
///
/// # Examples
/// ```
/// use taskboard::domain::ordering::append_position;
///
/// assert_eq!(append_position([]), 1.0);
/// assert_eq!(append_position([2.0, 1.0]), 3.0);
/// ```
#[must_use]
pub fn append_position(positions: impl IntoIterator<Item = f64>) -> f64 {
    positions
        .into_iter()
        .reduce(f64::max)
        .map_or(FIRST_POSITION, |max| max + APPEND_STEP)
}

/// Whether `value` no longer fits strictly between its neighbours.
///
/// The lower bound of a scope is zero, so values collapsing towards zero
/// through repeated front inserts also count as exhausted.
#[must_use]
pub fn gap_exhausted(before: Option<f64>, value: f64, after: Option<f64>) -> bool {
    if !value.is_finite() || value < MIN_POSITION_GAP {
        return true;
    }
    let too_close_below = before.is_some_and(|prev| !prev.is_finite() || value - prev < MIN_POSITION_GAP);
    let too_close_above = after.is_some_and(|next| !next.is_finite() || next - value < MIN_POSITION_GAP);
    too_close_below || too_close_above
}

/// Whether an ascending sequence has collided, inverted, or non-finite
/// entries anywhere.
#[must_use]
pub fn needs_rebalance(ordered: &[f64]) -> bool {
    let mut previous = None;
    for &value in ordered {
        if gap_exhausted(previous, value, None) {
            return true;
        }
        previous = Some(value);
    }
    false
}

/// Evenly spaced positions `1, 2, …, count`.
///
/// # Examples
/// ```
/// use taskboard::domain::ordering::rebalanced_positions;
///
/// let positions: Vec<f64> = rebalanced_positions(3).collect();
/// assert_eq!(positions, vec![1.0, 2.0, 3.0]);
/// ```
pub fn rebalanced_positions(count: usize) -> impl Iterator<Item = f64> {
    std::iter::successors(Some(FIRST_POSITION), |position| {
        Some(position + APPEND_STEP)
    })
    .take(count)
}
