//! Driving ports for board use-cases.

use async_trait::async_trait;

use crate::domain::{Board, BoardDraft, BoardId, BoardPatch, Error, UserId};

/// Board mutations.
#[async_trait]
pub trait BoardCommand: Send + Sync {
    /// Create a board owned by `actor`.
    async fn create(&self, draft: BoardDraft, actor: UserId) -> Result<Board, Error>;

    /// Rename or redescribe a board. Owner only.
    async fn update(
        &self,
        board_id: BoardId,
        patch: BoardPatch,
        actor: UserId,
    ) -> Result<Board, Error>;

    /// Delete a board and everything on it. Owner only.
    async fn delete(&self, board_id: BoardId, actor: UserId) -> Result<(), Error>;

    /// Add a registered user to the member set. Owner only.
    async fn add_member(
        &self,
        board_id: BoardId,
        member: UserId,
        actor: UserId,
    ) -> Result<Board, Error>;
}

/// Board reads.
#[async_trait]
pub trait BoardQuery: Send + Sync {
    /// Boards the actor belongs to.
    async fn list(&self, actor: UserId) -> Result<Vec<Board>, Error>;

    /// One board, gated by membership.
    async fn get(&self, board_id: BoardId, actor: UserId) -> Result<Board, Error>;
}
