//! PostgreSQL-backed `BoardRepository`.
//!
//! Member sets are stored as a `uuid[]` column; membership queries use the
//! array containment operator so the GIN index applies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{BoardRepository, BoardRepositoryError};
use crate::domain::{Board, BoardId, BoardPatch, UserId};

use super::diesel_basic_error_mapping::StorageError;
use super::models::{BoardChanges, BoardRow, NewBoardRow};
use super::pool::DbPool;
use super::schema::boards;

/// Diesel implementation of [`BoardRepository`].
#[derive(Clone)]
pub struct DieselBoardRepository {
    pool: DbPool,
}

impl DieselBoardRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardRepository for DieselBoardRepository {
    async fn insert(&self, board: &Board) -> Result<(), BoardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(BoardRepositoryError::from_pool)?;
        diesel::insert_into(boards::table)
            .values(NewBoardRow::from(board))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(BoardRepositoryError::from_diesel)
    }

    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(BoardRepositoryError::from_pool)?;
        let row: Option<BoardRow> = boards::table
            .find(*id.as_uuid())
            .select(BoardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(BoardRepositoryError::from_diesel)?;
        Ok(row.map(Board::from))
    }

    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Board>, BoardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(BoardRepositoryError::from_pool)?;
        let rows: Vec<BoardRow> = boards::table
            .filter(boards::member_ids.contains(vec![*user.as_uuid()]))
            .order_by(boards::created_at.asc())
            .select(BoardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(BoardRepositoryError::from_diesel)?;
        Ok(rows.into_iter().map(Board::from).collect())
    }

    async fn update(
        &self,
        id: &BoardId,
        patch: &BoardPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(BoardRepositoryError::from_pool)?;
        let row: Option<BoardRow> = diesel::update(boards::table.find(*id.as_uuid()))
            .set(BoardChanges::new(patch, at))
            .returning(BoardRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(BoardRepositoryError::from_diesel)?;
        Ok(row.map(Board::from))
    }

    async fn add_member(
        &self,
        id: &BoardId,
        user: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(BoardRepositoryError::from_pool)?;
        let board_id = *id.as_uuid();
        let member = *user.as_uuid();

        let row = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let current: Option<BoardRow> = boards::table
                        .find(board_id)
                        .select(BoardRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(mut current) = current else {
                        return Ok(None);
                    };
                    if current.member_ids.contains(&member) {
                        return Ok(Some(current));
                    }
                    current.member_ids.push(member);
                    diesel::update(boards::table.find(board_id))
                        .set((
                            boards::member_ids.eq(current.member_ids),
                            boards::updated_at.eq(at),
                        ))
                        .returning(BoardRow::as_returning())
                        .get_result(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(BoardRepositoryError::from_diesel)?;
        Ok(row.map(Board::from))
    }

    async fn delete(&self, id: &BoardId) -> Result<bool, BoardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(BoardRepositoryError::from_pool)?;
        let removed = diesel::delete(boards::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(BoardRepositoryError::from_diesel)?;
        Ok(removed > 0)
    }
}
