//! Port for task persistence.
//!
//! Every operation that changes which card a task belongs to also adjusts the
//! affected cards' `tasks_count` inside the same unit of work, so the counter
//! always equals the number of live tasks in the card.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CardId, Task, TaskId, TaskPatch, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by task repository adapters.
    pub enum TaskRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
    }
}

/// Destination for a task move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskRelocation {
    /// Task being moved.
    pub task_id: TaskId,
    /// Card the task currently belongs to.
    pub from_card: CardId,
    /// Card receiving the task.
    pub to_card: CardId,
    /// Freshly allocated position within `to_card`.
    pub position: f64,
    /// Modification timestamp.
    pub at: DateTime<Utc>,
}

impl TaskRelocation {
    /// Whether the move changes the owning card.
    #[must_use]
    pub fn crosses_cards(&self) -> bool {
        self.from_card != self.to_card
    }
}

/// Storage for tasks and the card counters they drive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist a new task and increment its card's counter.
    async fn insert(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Fetch a task by id.
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// Every task in a card, in no particular order.
    async fn list_by_card(&self, card_id: &CardId) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Apply a field update. Card membership and position are untouched.
    async fn update(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError>;

    /// Set the assignee.
    async fn assign(
        &self,
        id: &TaskId,
        member: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError>;

    /// Write a task's card and position; when the card changes, decrement
    /// the source counter and increment the destination counter.
    async fn relocate(
        &self,
        relocation: &TaskRelocation,
    ) -> Result<Option<Task>, TaskRepositoryError>;

    /// Overwrite the positions of several tasks in one unit of work.
    async fn reposition(
        &self,
        positions: &[(TaskId, f64)],
        at: DateTime<Utc>,
    ) -> Result<(), TaskRepositoryError>;

    /// Remove a task and decrement its card's counter.
    async fn delete(&self, id: &TaskId) -> Result<bool, TaskRepositoryError>;
}
