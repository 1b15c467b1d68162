//! Task ordering service.
//!
//! Tasks are ordered within their card. Moving a task between cards is one
//! relocation: the repository updates the task and both card counters in a
//! single unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::lookups::{card_on_board, member_board, task_in_card, task_not_found};
use crate::domain::ordering::{SiblingScope, needs_rebalance};
use crate::domain::ports::{
    BoardRepository, CardRef, CardRepository, MoveTaskRequest, RebalanceOutcome, TaskCommand,
    TaskQuery, TaskRef, TaskRelocation, TaskRepository,
};
use crate::domain::{CardId, Error, Task, TaskDraft, TaskId, TaskPatch, UserId};

/// Task service implementing the task driving ports.
#[derive(Clone)]
pub struct TaskOrderingService<B, C, T> {
    boards: Arc<B>,
    cards: Arc<C>,
    tasks: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<B, C, T> TaskOrderingService<B, C, T> {
    /// Create a service over the given repositories.
    pub fn new(boards: Arc<B>, cards: Arc<C>, tasks: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            boards,
            cards,
            tasks,
            clock,
        }
    }
}

impl<B, C, T> TaskOrderingService<B, C, T>
where
    B: BoardRepository,
    C: CardRepository,
    T: TaskRepository,
{
    /// Check membership and that the card belongs to the board.
    async fn authorize_card(&self, card: &CardRef, actor: &UserId) -> Result<(), Error> {
        member_board(self.boards.as_ref(), &card.board_id, actor).await?;
        card_on_board(self.cards.as_ref(), &card.board_id, &card.card_id).await?;
        Ok(())
    }

    async fn authorized_task(&self, task: &TaskRef, actor: &UserId) -> Result<Task, Error> {
        self.authorize_card(&task.card, actor).await?;
        task_in_card(self.tasks.as_ref(), &task.card.card_id, &task.task_id).await
    }

    async fn card_scope(
        &self,
        card_id: &CardId,
        moving: Option<TaskId>,
    ) -> Result<SiblingScope<Task>, Error> {
        let tasks = self.tasks.list_by_card(card_id).await?;
        Ok(SiblingScope::resolve(tasks, moving))
    }

    /// Renumber the destination card if the written position collided.
    async fn settle(&self, moved: Task, slot: usize) -> Result<Task, Error> {
        let scope = self.card_scope(&moved.card_id, Some(moved.id)).await?;
        let slot = scope.landing_slot(slot, moved.position);
        if !scope.slot_exhausted(slot, moved.position) {
            return Ok(moved);
        }

        let plan = scope.renumber_with(moved.id, slot);
        info!(
            card_id = %moved.card_id,
            tasks = plan.len(),
            "task position gap exhausted; renumbering card"
        );
        let now = self.clock.utc();
        self.tasks.reposition(&plan, now).await?;

        let position = plan
            .iter()
            .find_map(|(id, position)| (*id == moved.id).then_some(*position))
            .unwrap_or(moved.position);
        Ok(Task {
            position,
            updated_at: now,
            ..moved
        })
    }
}

#[async_trait]
impl<B, C, T> TaskCommand for TaskOrderingService<B, C, T>
where
    B: BoardRepository,
    C: CardRepository,
    T: TaskRepository,
{
    async fn create(&self, card: CardRef, draft: TaskDraft, actor: UserId) -> Result<Task, Error> {
        self.authorize_card(&card, &actor).await?;
        let position = self.card_scope(&card.card_id, None).await?.append_position();

        let task = Task::create(card.card_id, draft, actor, position, self.clock.utc());
        self.tasks.insert(&task).await?;
        debug!(task_id = %task.id, card_id = %card.card_id, position, "task created");
        Ok(task)
    }

    async fn update(&self, task: TaskRef, patch: TaskPatch, actor: UserId) -> Result<Task, Error> {
        self.authorized_task(&task, &actor).await?;
        self.tasks
            .update(&task.task_id, &patch, self.clock.utc())
            .await?
            .ok_or_else(task_not_found)
    }

    async fn delete(&self, task: TaskRef, actor: UserId) -> Result<(), Error> {
        self.authorized_task(&task, &actor).await?;
        if !self.tasks.delete(&task.task_id).await? {
            return Err(task_not_found());
        }
        debug!(task_id = %task.task_id, card_id = %task.card.card_id, "task deleted");
        Ok(())
    }

    async fn assign(&self, task: TaskRef, member: UserId, actor: UserId) -> Result<Task, Error> {
        let board = member_board(self.boards.as_ref(), &task.card.board_id, &actor).await?;
        if !board.is_member(&member) {
            return Err(Error::invalid_input("Assignee must be a board member"));
        }
        card_on_board(self.cards.as_ref(), &task.card.board_id, &task.card.card_id).await?;
        task_in_card(self.tasks.as_ref(), &task.card.card_id, &task.task_id).await?;

        self.tasks
            .assign(&task.task_id, &member, self.clock.utc())
            .await?
            .ok_or_else(task_not_found)
    }

    async fn move_task(&self, request: MoveTaskRequest) -> Result<Task, Error> {
        let MoveTaskRequest {
            task: target,
            to_card_id,
            index,
            actor,
        } = request;
        let task = self.authorized_task(&target, &actor).await?;
        if to_card_id != target.card.card_id {
            card_on_board(self.cards.as_ref(), &target.card.board_id, &to_card_id).await?;
        }

        let siblings = self.card_scope(&to_card_id, Some(task.id)).await?;
        let slot = siblings.clamp_index(index);
        let relocation = TaskRelocation {
            task_id: task.id,
            from_card: task.card_id,
            to_card: to_card_id,
            position: siblings.position_for(slot),
            at: self.clock.utc(),
        };
        debug!(
            task_id = %task.id,
            from_card = %relocation.from_card,
            to_card = %relocation.to_card,
            slot,
            position = relocation.position,
            "moving task"
        );

        let moved = self
            .tasks
            .relocate(&relocation)
            .await?
            .ok_or_else(task_not_found)?;
        self.settle(moved, slot).await
    }

    async fn rebalance(&self, card: CardRef, actor: UserId) -> Result<RebalanceOutcome, Error> {
        self.authorize_card(&card, &actor).await?;
        let scope = self.card_scope(&card.card_id, None).await?;
        if !needs_rebalance(&scope.positions()) {
            return Ok(RebalanceOutcome { renumbered: 0 });
        }

        let plan = scope.renumber();
        self.tasks.reposition(&plan, self.clock.utc()).await?;
        info!(card_id = %card.card_id, tasks = plan.len(), "card tasks renumbered");
        Ok(RebalanceOutcome {
            renumbered: plan.len(),
        })
    }
}

#[async_trait]
impl<B, C, T> TaskQuery for TaskOrderingService<B, C, T>
where
    B: BoardRepository,
    C: CardRepository,
    T: TaskRepository,
{
    async fn list(&self, card: CardRef, actor: UserId) -> Result<Vec<Task>, Error> {
        self.authorize_card(&card, &actor).await?;
        Ok(self.card_scope(&card.card_id, None).await?.into_members())
    }

    async fn get(&self, task: TaskRef, actor: UserId) -> Result<Task, Error> {
        self.authorized_task(&task, &actor).await
    }
}

#[cfg(test)]
#[path = "task_service_tests.rs"]
mod tests;
