//! PostgreSQL-backed `TaskRepository`.
//!
//! Each write that changes a card's task set runs in one transaction with the
//! `tasks_count` adjustment, using in-place `tasks_count + n` updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{TaskRelocation, TaskRepository, TaskRepositoryError};
use crate::domain::{CardId, Task, TaskId, TaskPatch, UserId};

use super::diesel_basic_error_mapping::StorageError;
use super::models::{NewTaskRow, TaskChanges, TaskRow};
use super::pool::DbPool;
use super::schema::{cards, tasks};

/// Diesel implementation of [`TaskRepository`].
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn adjust_count(
    conn: &mut AsyncPgConnection,
    card_id: Uuid,
    delta: i32,
) -> Result<(), diesel::result::Error> {
    diesel::update(cards::table.find(card_id))
        .set(cards::tasks_count.eq(cards::tasks_count + delta))
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn insert(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(TaskRepositoryError::from_pool)?;
        let row = NewTaskRow::from(task);
        let card_id = row.card_id;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(tasks::table)
                    .values(row)
                    .execute(conn)
                    .await?;
                adjust_count(conn, card_id, 1).await
            }
            .scope_boxed()
        })
        .await
        .map_err(TaskRepositoryError::from_diesel)
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(TaskRepositoryError::from_pool)?;
        let row: Option<TaskRow> = tasks::table
            .find(*id.as_uuid())
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(TaskRepositoryError::from_diesel)?;
        Ok(row.map(Task::from))
    }

    async fn list_by_card(&self, card_id: &CardId) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(TaskRepositoryError::from_pool)?;
        let rows: Vec<TaskRow> = tasks::table
            .filter(tasks::card_id.eq(*card_id.as_uuid()))
            .order_by((tasks::position.asc(), tasks::created_at.asc()))
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(TaskRepositoryError::from_diesel)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn update(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(TaskRepositoryError::from_pool)?;
        let row: Option<TaskRow> = diesel::update(tasks::table.find(*id.as_uuid()))
            .set(TaskChanges::new(patch, at))
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(TaskRepositoryError::from_diesel)?;
        Ok(row.map(Task::from))
    }

    async fn assign(
        &self,
        id: &TaskId,
        member: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(TaskRepositoryError::from_pool)?;
        let row: Option<TaskRow> = diesel::update(tasks::table.find(*id.as_uuid()))
            .set((
                tasks::assigned_to.eq(Some(*member.as_uuid())),
                tasks::updated_at.eq(at),
            ))
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(TaskRepositoryError::from_diesel)?;
        Ok(row.map(Task::from))
    }

    async fn relocate(
        &self,
        relocation: &TaskRelocation,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(TaskRepositoryError::from_pool)?;
        let relocation = *relocation;
        let task_id = *relocation.task_id.as_uuid();
        let from_card = *relocation.from_card.as_uuid();
        let to_card = *relocation.to_card.as_uuid();

        let row = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let moved: Option<TaskRow> = diesel::update(
                        tasks::table
                            .find(task_id)
                            .filter(tasks::card_id.eq(from_card)),
                    )
                    .set((
                        tasks::card_id.eq(to_card),
                        tasks::position.eq(relocation.position),
                        tasks::updated_at.eq(relocation.at),
                    ))
                    .returning(TaskRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    if moved.is_some() && relocation.crosses_cards() {
                        adjust_count(conn, from_card, -1).await?;
                        adjust_count(conn, to_card, 1).await?;
                    }
                    Ok(moved)
                }
                .scope_boxed()
            })
            .await
            .map_err(TaskRepositoryError::from_diesel)?;
        Ok(row.map(Task::from))
    }

    async fn reposition(
        &self,
        moves: &[(TaskId, f64)],
        at: DateTime<Utc>,
    ) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(TaskRepositoryError::from_pool)?;
        let moves: Vec<(Uuid, f64)> = moves
            .iter()
            .map(|(id, position)| (*id.as_uuid(), *position))
            .collect();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                for (id, position) in moves {
                    diesel::update(tasks::table.find(id))
                        .set((tasks::position.eq(position), tasks::updated_at.eq(at)))
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(TaskRepositoryError::from_diesel)
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(TaskRepositoryError::from_pool)?;
        let task_id = *id.as_uuid();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let card_id: Option<Uuid> = diesel::delete(tasks::table.find(task_id))
                    .returning(tasks::card_id)
                    .get_result(conn)
                    .await
                    .optional()?;
                match card_id {
                    Some(card_id) => {
                        adjust_count(conn, card_id, -1).await?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(TaskRepositoryError::from_diesel)
    }
}
