//! Port for board persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Board, BoardId, BoardPatch, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by board repository adapters.
    pub enum BoardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "board repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "board repository query failed: {message}",
    }
}

/// Storage for boards and their member sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Persist a new board.
    async fn insert(&self, board: &Board) -> Result<(), BoardRepositoryError>;

    /// Fetch a board by id.
    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError>;

    /// Boards whose member set contains `user`.
    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Board>, BoardRepositoryError>;

    /// Apply a partial update, returning the stored board or `None` when it
    /// no longer exists.
    async fn update(
        &self,
        id: &BoardId,
        patch: &BoardPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Board>, BoardRepositoryError>;

    /// Append `user` to the member set unless already present.
    async fn add_member(
        &self,
        id: &BoardId,
        user: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Board>, BoardRepositoryError>;

    /// Remove a board together with its cards and tasks.
    async fn delete(&self, id: &BoardId) -> Result<bool, BoardRepositoryError>;
}
