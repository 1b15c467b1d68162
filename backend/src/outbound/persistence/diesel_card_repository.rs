//! PostgreSQL-backed `CardRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CardRepository, CardRepositoryError};
use crate::domain::{BoardId, Card, CardId, CardPatch, CardStatus, UserId};

use super::diesel_basic_error_mapping::StorageError;
use super::models::{CardChanges, CardRow, NewCardRow};
use super::pool::DbPool;
use super::schema::cards;

/// Diesel implementation of [`CardRepository`].
#[derive(Clone)]
pub struct DieselCardRepository {
    pool: DbPool,
}

impl DieselCardRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_cards(rows: Vec<CardRow>) -> Vec<Card> {
    rows.into_iter().map(Card::from).collect()
}

#[async_trait]
impl CardRepository for DieselCardRepository {
    async fn insert(&self, card: &Card) -> Result<(), CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(CardRepositoryError::from_pool)?;
        diesel::insert_into(cards::table)
            .values(NewCardRow::from(card))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(CardRepositoryError::from_diesel)
    }

    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(CardRepositoryError::from_pool)?;
        let row: Option<CardRow> = cards::table
            .find(*id.as_uuid())
            .select(CardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(CardRepositoryError::from_diesel)?;
        Ok(row.map(Card::from))
    }

    async fn list_by_board(&self, board_id: &BoardId) -> Result<Vec<Card>, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(CardRepositoryError::from_pool)?;
        let rows: Vec<CardRow> = cards::table
            .filter(cards::board_id.eq(*board_id.as_uuid()))
            .order_by((cards::position.asc(), cards::created_at.asc()))
            .select(CardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(CardRepositoryError::from_diesel)?;
        Ok(into_cards(rows))
    }

    async fn list_by_board_and_member(
        &self,
        board_id: &BoardId,
        member: &UserId,
    ) -> Result<Vec<Card>, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(CardRepositoryError::from_pool)?;
        let rows: Vec<CardRow> = cards::table
            .filter(cards::board_id.eq(*board_id.as_uuid()))
            .filter(cards::member_ids.contains(vec![*member.as_uuid()]))
            .order_by((cards::position.asc(), cards::created_at.asc()))
            .select(CardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(CardRepositoryError::from_diesel)?;
        Ok(into_cards(rows))
    }

    async fn update(
        &self,
        id: &CardId,
        patch: &CardPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Card>, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(CardRepositoryError::from_pool)?;
        let row: Option<CardRow> = diesel::update(cards::table.find(*id.as_uuid()))
            .set(CardChanges::new(patch, at))
            .returning(CardRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(CardRepositoryError::from_diesel)?;
        Ok(row.map(Card::from))
    }

    async fn place(
        &self,
        id: &CardId,
        status: CardStatus,
        position: f64,
        at: DateTime<Utc>,
    ) -> Result<Option<Card>, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(CardRepositoryError::from_pool)?;
        let row: Option<CardRow> = diesel::update(cards::table.find(*id.as_uuid()))
            .set((
                cards::status.eq(status.as_str()),
                cards::position.eq(position),
                cards::updated_at.eq(at),
            ))
            .returning(CardRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(CardRepositoryError::from_diesel)?;
        Ok(row.map(Card::from))
    }

    async fn reposition(
        &self,
        moves: &[(CardId, f64)],
        at: DateTime<Utc>,
    ) -> Result<(), CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(CardRepositoryError::from_pool)?;
        let moves: Vec<(Uuid, f64)> = moves
            .iter()
            .map(|(id, position)| (*id.as_uuid(), *position))
            .collect();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                for (id, position) in moves {
                    diesel::update(cards::table.find(id))
                        .set((cards::position.eq(position), cards::updated_at.eq(at)))
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(CardRepositoryError::from_diesel)
    }

    async fn delete(&self, id: &CardId) -> Result<bool, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(CardRepositoryError::from_pool)?;
        let removed = diesel::delete(cards::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(CardRepositoryError::from_diesel)?;
        Ok(removed > 0)
    }
}
