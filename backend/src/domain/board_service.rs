//! Board service: creation, ownership-gated edits, and membership.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::authorization::{require_member, require_owner};
use crate::domain::lookups::board_not_found;
use crate::domain::ports::{BoardCommand, BoardQuery, BoardRepository, UserRepository};
use crate::domain::{Board, BoardDraft, BoardId, BoardPatch, Error, UserId};

/// Board service implementing the board driving ports.
#[derive(Clone)]
pub struct BoardService<B, U> {
    boards: Arc<B>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<B, U> BoardService<B, U> {
    /// Create a service over the board and user repositories.
    pub fn new(boards: Arc<B>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            boards,
            users,
            clock,
        }
    }
}

impl<B, U> BoardService<B, U>
where
    B: BoardRepository,
    U: UserRepository,
{
    async fn load(&self, board_id: &BoardId) -> Result<Board, Error> {
        self.boards
            .find_by_id(board_id)
            .await?
            .ok_or_else(board_not_found)
    }

    async fn owned(&self, board_id: &BoardId, actor: &UserId) -> Result<Board, Error> {
        let board = self.load(board_id).await?;
        require_owner(&board, actor)?;
        Ok(board)
    }
}

#[async_trait]
impl<B, U> BoardCommand for BoardService<B, U>
where
    B: BoardRepository,
    U: UserRepository,
{
    async fn create(&self, draft: BoardDraft, actor: UserId) -> Result<Board, Error> {
        let board = Board::create(draft, actor, self.clock.utc());
        self.boards.insert(&board).await?;
        debug!(board_id = %board.id, owner = %actor, "board created");
        Ok(board)
    }

    async fn update(
        &self,
        board_id: BoardId,
        patch: BoardPatch,
        actor: UserId,
    ) -> Result<Board, Error> {
        self.owned(&board_id, &actor).await?;
        self.boards
            .update(&board_id, &patch, self.clock.utc())
            .await?
            .ok_or_else(board_not_found)
    }

    async fn delete(&self, board_id: BoardId, actor: UserId) -> Result<(), Error> {
        self.owned(&board_id, &actor).await?;
        if !self.boards.delete(&board_id).await? {
            return Err(board_not_found());
        }
        info!(%board_id, "board deleted");
        Ok(())
    }

    async fn add_member(
        &self,
        board_id: BoardId,
        member: UserId,
        actor: UserId,
    ) -> Result<Board, Error> {
        let board = self.owned(&board_id, &actor).await?;
        if board.is_member(&member) {
            return Ok(board);
        }
        if self.users.find_by_id(&member).await?.is_none() {
            return Err(Error::invalid_input("Member must be a registered user"));
        }
        self.boards
            .add_member(&board_id, &member, self.clock.utc())
            .await?
            .ok_or_else(board_not_found)
    }
}

#[async_trait]
impl<B, U> BoardQuery for BoardService<B, U>
where
    B: BoardRepository,
    U: UserRepository,
{
    async fn list(&self, actor: UserId) -> Result<Vec<Board>, Error> {
        let mut boards = self.boards.list_for_member(&actor).await?;
        boards.sort_by(|left, right| left.created_at.cmp(&right.created_at));
        Ok(boards)
    }

    async fn get(&self, board_id: BoardId, actor: UserId) -> Result<Board, Error> {
        let board = self.load(&board_id).await?;
        require_member(&board, &actor)?;
        Ok(board)
    }
}

#[cfg(test)]
#[path = "board_service_tests.rs"]
mod tests;
