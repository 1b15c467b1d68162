//! Port for card persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BoardId, Card, CardId, CardPatch, CardStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by card repository adapters.
    pub enum CardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "card repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "card repository query failed: {message}",
    }
}

/// Storage for cards.
///
/// Adapters never recompute `tasks_count`; the task repository owns it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Persist a new card.
    async fn insert(&self, card: &Card) -> Result<(), CardRepositoryError>;

    /// Fetch a card by id.
    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, CardRepositoryError>;

    /// Every card on a board, in no particular order.
    async fn list_by_board(&self, board_id: &BoardId) -> Result<Vec<Card>, CardRepositoryError>;

    /// Cards on a board whose member set contains `user`.
    async fn list_by_board_and_member(
        &self,
        board_id: &BoardId,
        user: &UserId,
    ) -> Result<Vec<Card>, CardRepositoryError>;

    /// Apply a name/description update.
    async fn update(
        &self,
        id: &CardId,
        patch: &CardPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Card>, CardRepositoryError>;

    /// Write a card's lane and position together.
    async fn place(
        &self,
        id: &CardId,
        status: CardStatus,
        position: f64,
        at: DateTime<Utc>,
    ) -> Result<Option<Card>, CardRepositoryError>;

    /// Overwrite the positions of several cards in one unit of work.
    async fn reposition(
        &self,
        positions: &[(CardId, f64)],
        at: DateTime<Utc>,
    ) -> Result<(), CardRepositoryError>;

    /// Remove a card and its tasks.
    async fn delete(&self, id: &CardId) -> Result<bool, CardRepositoryError>;
}
