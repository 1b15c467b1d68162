//! Sibling scope resolution.
//!
//! Turns the unsorted members of a scope into the ascending sequence the
//! allocator consumes, with the moving item left out.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::position::{append_position, compute_position, gap_exhausted, rebalanced_positions};

/// Entity ordered by a fractional position.
pub trait Positioned {
    /// Identifier type of the entity.
    type Id: Copy + Eq + Ord;

    /// Identifier of this entity.
    fn id(&self) -> Self::Id;
    /// Current sort key.
    fn position(&self) -> f64;
    /// Creation time, used to break position ties.
    fn created_at(&self) -> DateTime<Utc>;
}

fn scope_order<T: Positioned>(left: &T, right: &T) -> Ordering {
    left.position()
        .total_cmp(&right.position())
        .then_with(|| left.created_at().cmp(&right.created_at()))
        .then_with(|| left.id().cmp(&right.id()))
}

/// Ordered members of one sibling scope.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use taskboard::domain::ordering::{Positioned, SiblingScope};
///
/// struct Item(u8, f64);
///
/// impl Positioned for Item {
///     type Id = u8;
///     fn id(&self) -> u8 { self.0 }
///     fn position(&self) -> f64 { self.1 }
///     fn created_at(&self) -> DateTime<Utc> { DateTime::UNIX_EPOCH }
/// }
///
/// let scope = SiblingScope::resolve(vec![Item(1, 3.0), Item(2, 1.0), Item(3, 2.0)], Some(3));
/// let ids: Vec<u8> = scope.members().iter().map(|item| item.0).collect();
/// assert_eq!(ids, vec![2, 1]);
/// assert_eq!(scope.position_for(1), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct SiblingScope<T> {
    members: Vec<T>,
}

impl<T: Positioned> SiblingScope<T> {
    /// Order `items` ascending by position, dropping the entity `moving`.
    ///
    /// An absent `moving` id is not an error; the full set is kept.
    pub fn resolve(items: impl IntoIterator<Item = T>, moving: Option<T::Id>) -> Self {
        let mut members: Vec<T> = items
            .into_iter()
            .filter(|item| moving.is_none_or(|id| item.id() != id))
            .collect();
        members.sort_by(scope_order);
        Self { members }
    }

    /// Members in ascending order.
    pub fn members(&self) -> &[T] {
        &self.members
    }

    /// Consume the scope, yielding ordered members.
    pub fn into_members(self) -> Vec<T> {
        self.members
    }

    /// Number of siblings.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the scope has no siblings.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Clamp a requested insertion index to `0..=len`.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.members.len())
    }

    /// Sibling positions in ascending order.
    pub fn positions(&self) -> Vec<f64> {
        self.members.iter().map(Positioned::position).collect()
    }

    /// Fresh position for an item inserted at `index`.
    pub fn position_for(&self, index: usize) -> f64 {
        compute_position(&self.positions(), index)
    }

    /// Position one step past the last sibling.
    pub fn append_position(&self) -> f64 {
        append_position(self.members.iter().map(Positioned::position))
    }

    /// Slot a member at `position` occupies: the count of siblings strictly
    /// below it.
    pub fn slot_of(&self, position: f64) -> usize {
        self.members
            .partition_point(|member| member.position().total_cmp(&position).is_lt())
    }

    /// Slot a freshly written `position` landed in.
    ///
    /// Keeps the requested `hint` while the neighbours there still bracket
    /// `position`, so exact ties stay where they were aimed; otherwise falls
    /// back to [`Self::slot_of`].
    pub fn landing_slot(&self, hint: usize, position: f64) -> usize {
        let slot = self.clamp_index(hint);
        let fits_below = slot
            .checked_sub(1)
            .and_then(|prev| self.members.get(prev))
            .is_none_or(|member| member.position() <= position);
        let fits_above = self
            .members
            .get(slot)
            .is_none_or(|member| position <= member.position());
        if fits_below && fits_above {
            slot
        } else {
            self.slot_of(position)
        }
    }

    /// Whether `position` has no usable gap at slot `index`.
    pub fn slot_exhausted(&self, index: usize, position: f64) -> bool {
        let slot = self.clamp_index(index);
        let before = slot
            .checked_sub(1)
            .and_then(|prev| self.members.get(prev))
            .map(Positioned::position);
        let after = self.members.get(slot).map(Positioned::position);
        gap_exhausted(before, position, after)
    }

    /// Renumbered positions for the scope with `moving` placed at `index`.
    pub fn renumber_with(&self, moving: T::Id, index: usize) -> Vec<(T::Id, f64)> {
        let slot = self.clamp_index(index);
        let mut ids: Vec<T::Id> = self.members.iter().map(Positioned::id).collect();
        ids.insert(slot, moving);
        ids.into_iter().zip(rebalanced_positions(self.members.len() + 1)).collect()
    }

    /// Renumbered positions for the scope in its current order.
    pub fn renumber(&self) -> Vec<(T::Id, f64)> {
        self.members
            .iter()
            .map(Positioned::id)
            .zip(rebalanced_positions(self.members.len()))
            .collect()
    }
}
