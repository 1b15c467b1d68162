//! Boards and their membership.

use chrono::{DateTime, Utc};

use super::patch::{Clearable, apply_field};
use super::{BoardId, UserId};

/// Shared workspace owning cards.
///
/// The owner is always a member.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub member_ids: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Create a board owned by `owner`, who becomes its first member.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use taskboard::domain::{Board, BoardDraft, UserId};
    ///
    /// let owner = UserId::random();
    /// let draft = BoardDraft { name: "Roadmap".into(), description: None };
    /// let board = Board::create(draft, owner, Utc::now());
    /// assert!(board.is_member(&owner));
    /// assert!(board.is_owner(&owner));
    /// ```
    #[must_use]
    pub fn create(draft: BoardDraft, owner: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: BoardId::random(),
            name: draft.name,
            description: draft.description,
            owner_id: owner,
            member_ids: vec![owner],
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user` appears in the member set.
    #[must_use]
    pub fn is_member(&self, user: &UserId) -> bool {
        self.member_ids.contains(user)
    }

    /// Whether `user` owns the board.
    #[must_use]
    pub fn is_owner(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    /// Add `user` to the member set unless already present.
    pub fn add_member(&mut self, user: UserId) {
        if !self.is_member(&user) {
            self.member_ids.push(user);
        }
    }

    /// Apply a partial update.
    pub fn apply(&mut self, patch: BoardPatch, now: DateTime<Utc>) {
        apply_field(patch.name, &mut self.name);
        patch.description.apply_to(&mut self.description);
        self.updated_at = now;
    }
}

/// Fields supplied when creating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDraft {
    pub name: String,
    pub description: Option<String>,
}

/// Partial board update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardPatch {
    pub name: Option<String>,
    pub description: Clearable<String>,
}
