//! Driving ports for card ordering and card reads.

use async_trait::async_trait;

use crate::domain::{BoardId, Card, CardDraft, CardId, CardPatch, CardStatus, Error, UserId};

/// A card addressed through its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRef {
    /// Board named in the request path.
    pub board_id: BoardId,
    /// Card named in the request path.
    pub card_id: CardId,
}

/// Request to move a card within its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCardRequest {
    /// Card being moved.
    pub card: CardRef,
    /// Target lane; the current lane when absent.
    pub status: Option<CardStatus>,
    /// Zero-based insertion index among the other cards on the board.
    pub index: usize,
    /// User performing the move.
    pub actor: UserId,
}

/// Result of a rebalance pass over one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebalanceOutcome {
    /// Number of members given new positions; zero when the scope was healthy.
    pub renumbered: usize,
}

/// Card mutations.
#[async_trait]
pub trait CardCommand: Send + Sync {
    /// Append a new card to the backlog lane.
    async fn create(
        &self,
        board_id: BoardId,
        draft: CardDraft,
        actor: UserId,
    ) -> Result<Card, Error>;

    /// Update name or description.
    async fn update(&self, card: CardRef, patch: CardPatch, actor: UserId) -> Result<Card, Error>;

    /// Remove a card and its tasks.
    async fn delete(&self, card: CardRef, actor: UserId) -> Result<(), Error>;

    /// Reposition a card and stamp its lane.
    async fn move_card(&self, request: MoveCardRequest) -> Result<Card, Error>;

    /// Renumber the board's cards when their gaps have collapsed.
    async fn rebalance(&self, board_id: BoardId, actor: UserId)
    -> Result<RebalanceOutcome, Error>;
}

/// Card reads.
#[async_trait]
pub trait CardQuery: Send + Sync {
    /// Cards on a board in position order.
    async fn list(&self, board_id: BoardId, actor: UserId) -> Result<Vec<Card>, Error>;

    /// Cards on a board that list `member`, in position order.
    async fn list_for_member(
        &self,
        board_id: BoardId,
        member: UserId,
        actor: UserId,
    ) -> Result<Vec<Card>, Error>;

    /// One card.
    async fn get(&self, card: CardRef, actor: UserId) -> Result<Card, Error>;
}
