//! Driving ports for task ordering and task reads.

use async_trait::async_trait;

use crate::domain::{CardId, Error, Task, TaskDraft, TaskId, TaskPatch, UserId};

use super::{CardRef, RebalanceOutcome};

/// A task addressed through its board and card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRef {
    /// Board and card named in the request path.
    pub card: CardRef,
    /// Task named in the request path.
    pub task_id: TaskId,
}

/// Request to move a task within or across cards of one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTaskRequest {
    /// Task being moved, addressed through its current card.
    pub task: TaskRef,
    /// Card receiving the task; may equal the current card.
    pub to_card_id: CardId,
    /// Zero-based insertion index among the destination's other tasks.
    pub index: usize,
    /// User performing the move.
    pub actor: UserId,
}

/// Task mutations.
#[async_trait]
pub trait TaskCommand: Send + Sync {
    /// Append a task to a card.
    async fn create(&self, card: CardRef, draft: TaskDraft, actor: UserId) -> Result<Task, Error>;

    /// Update task fields other than card and position.
    async fn update(&self, task: TaskRef, patch: TaskPatch, actor: UserId) -> Result<Task, Error>;

    /// Remove a task.
    async fn delete(&self, task: TaskRef, actor: UserId) -> Result<(), Error>;

    /// Assign a board member.
    async fn assign(&self, task: TaskRef, member: UserId, actor: UserId) -> Result<Task, Error>;

    /// Reposition a task, possibly into another card.
    async fn move_task(&self, request: MoveTaskRequest) -> Result<Task, Error>;

    /// Renumber a card's tasks when their gaps have collapsed.
    async fn rebalance(&self, card: CardRef, actor: UserId) -> Result<RebalanceOutcome, Error>;
}

/// Task reads.
#[async_trait]
pub trait TaskQuery: Send + Sync {
    /// Tasks of a card in position order.
    async fn list(&self, card: CardRef, actor: UserId) -> Result<Vec<Task>, Error>;

    /// One task.
    async fn get(&self, task: TaskRef, actor: UserId) -> Result<Task, Error>;
}
