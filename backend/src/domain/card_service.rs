//! Card ordering service.
//!
//! Cards share one sibling scope per board regardless of their status lane.
//! A move writes a single fresh position; the board is renumbered only when
//! a re-read after the write shows that position has no gap left.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::lookups::{card_not_found, card_on_board, member_board};
use crate::domain::ordering::{SiblingScope, needs_rebalance};
use crate::domain::ports::{
    BoardRepository, CardCommand, CardQuery, CardRef, CardRepository, MoveCardRequest,
    RebalanceOutcome,
};
use crate::domain::{BoardId, Card, CardDraft, CardId, CardPatch, CardStatus, Error, UserId};

/// Card service implementing the card driving ports.
#[derive(Clone)]
pub struct CardOrderingService<B, C> {
    boards: Arc<B>,
    cards: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<B, C> CardOrderingService<B, C> {
    /// Create a service over the given repositories.
    pub fn new(boards: Arc<B>, cards: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            boards,
            cards,
            clock,
        }
    }
}

impl<B, C> CardOrderingService<B, C>
where
    B: BoardRepository,
    C: CardRepository,
{
    async fn board_scope(
        &self,
        board_id: &BoardId,
        moving: Option<CardId>,
    ) -> Result<SiblingScope<Card>, Error> {
        let cards = self.cards.list_by_board(board_id).await?;
        Ok(SiblingScope::resolve(cards, moving))
    }

    /// Renumber the board if the freshly written position collided.
    async fn settle(&self, moved: Card, slot: usize) -> Result<Card, Error> {
        let scope = self.board_scope(&moved.board_id, Some(moved.id)).await?;
        let slot = scope.landing_slot(slot, moved.position);
        if !scope.slot_exhausted(slot, moved.position) {
            return Ok(moved);
        }

        let plan = scope.renumber_with(moved.id, slot);
        info!(
            board_id = %moved.board_id,
            cards = plan.len(),
            "card position gap exhausted; renumbering board"
        );
        let now = self.clock.utc();
        self.cards.reposition(&plan, now).await?;

        let position = plan
            .iter()
            .find_map(|(id, position)| (*id == moved.id).then_some(*position))
            .unwrap_or(moved.position);
        Ok(Card {
            position,
            updated_at: now,
            ..moved
        })
    }
}

#[async_trait]
impl<B, C> CardCommand for CardOrderingService<B, C>
where
    B: BoardRepository,
    C: CardRepository,
{
    async fn create(
        &self,
        board_id: BoardId,
        draft: CardDraft,
        actor: UserId,
    ) -> Result<Card, Error> {
        member_board(self.boards.as_ref(), &board_id, &actor).await?;

        let lane = self
            .cards
            .list_by_board(&board_id)
            .await?
            .into_iter()
            .filter(|card| card.status == CardStatus::Backlog);
        let position = SiblingScope::resolve(lane, None).append_position();

        let card = Card::create(board_id, draft, actor, position, self.clock.utc());
        self.cards.insert(&card).await?;
        debug!(card_id = %card.id, %board_id, position, "card created");
        Ok(card)
    }

    async fn update(&self, card: CardRef, patch: CardPatch, actor: UserId) -> Result<Card, Error> {
        member_board(self.boards.as_ref(), &card.board_id, &actor).await?;
        card_on_board(self.cards.as_ref(), &card.board_id, &card.card_id).await?;
        self.cards
            .update(&card.card_id, &patch, self.clock.utc())
            .await?
            .ok_or_else(card_not_found)
    }

    async fn delete(&self, card: CardRef, actor: UserId) -> Result<(), Error> {
        member_board(self.boards.as_ref(), &card.board_id, &actor).await?;
        card_on_board(self.cards.as_ref(), &card.board_id, &card.card_id).await?;
        if !self.cards.delete(&card.card_id).await? {
            return Err(card_not_found());
        }
        debug!(card_id = %card.card_id, board_id = %card.board_id, "card deleted");
        Ok(())
    }

    async fn move_card(&self, request: MoveCardRequest) -> Result<Card, Error> {
        let MoveCardRequest {
            card: target,
            status,
            index,
            actor,
        } = request;
        member_board(self.boards.as_ref(), &target.board_id, &actor).await?;
        let card = card_on_board(self.cards.as_ref(), &target.board_id, &target.card_id).await?;

        let siblings = self.board_scope(&target.board_id, Some(card.id)).await?;
        let slot = siblings.clamp_index(index);
        let position = siblings.position_for(slot);
        let status = status.unwrap_or(card.status);
        debug!(
            card_id = %card.id,
            board_id = %target.board_id,
            slot,
            position,
            %status,
            "moving card"
        );

        let moved = self
            .cards
            .place(&card.id, status, position, self.clock.utc())
            .await?
            .ok_or_else(card_not_found)?;
        self.settle(moved, slot).await
    }

    async fn rebalance(
        &self,
        board_id: BoardId,
        actor: UserId,
    ) -> Result<RebalanceOutcome, Error> {
        member_board(self.boards.as_ref(), &board_id, &actor).await?;
        let scope = self.board_scope(&board_id, None).await?;
        if !needs_rebalance(&scope.positions()) {
            return Ok(RebalanceOutcome { renumbered: 0 });
        }

        let plan = scope.renumber();
        self.cards.reposition(&plan, self.clock.utc()).await?;
        info!(%board_id, cards = plan.len(), "board cards renumbered");
        Ok(RebalanceOutcome {
            renumbered: plan.len(),
        })
    }
}

#[async_trait]
impl<B, C> CardQuery for CardOrderingService<B, C>
where
    B: BoardRepository,
    C: CardRepository,
{
    async fn list(&self, board_id: BoardId, actor: UserId) -> Result<Vec<Card>, Error> {
        member_board(self.boards.as_ref(), &board_id, &actor).await?;
        Ok(self.board_scope(&board_id, None).await?.into_members())
    }

    async fn list_for_member(
        &self,
        board_id: BoardId,
        member: UserId,
        actor: UserId,
    ) -> Result<Vec<Card>, Error> {
        member_board(self.boards.as_ref(), &board_id, &actor).await?;
        let cards = self
            .cards
            .list_by_board_and_member(&board_id, &member)
            .await?;
        Ok(SiblingScope::resolve(cards, None).into_members())
    }

    async fn get(&self, card: CardRef, actor: UserId) -> Result<Card, Error> {
        member_board(self.boards.as_ref(), &card.board_id, &actor).await?;
        card_on_board(self.cards.as_ref(), &card.board_id, &card.card_id).await
    }
}

#[cfg(test)]
#[path = "card_service_tests.rs"]
mod tests;
