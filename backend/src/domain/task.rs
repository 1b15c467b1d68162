//! Tasks: ordered work items inside a card.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::ordering::Positioned;
use super::patch::{Clearable, apply_field};
use super::{CardId, TaskId, UserId};

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Task workflow state, independent of the card it sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown priority or status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {input}")]
pub struct ParseTaskFieldError {
    /// Which field failed to parse.
    pub kind: &'static str,
    /// The unrecognised input value.
    pub input: String,
}

impl FromStr for TaskPriority {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskFieldError {
                kind: "task priority",
                input: s.to_owned(),
            }),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskFieldError {
                kind: "task status",
                input: s.to_owned(),
            }),
        }
    }
}

/// Work item ordered within its owning card.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub card_id: CardId,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub position: f64,
    /// Board member responsible for the task.
    pub assigned_to: Option<UserId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// New task in `card_id` at `position`, applying draft defaults.
    #[must_use]
    pub fn create(
        card_id: CardId,
        draft: TaskDraft,
        creator: UserId,
        position: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskId::random(),
            card_id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            deadline: draft.deadline,
            position,
            assigned_to: None,
            created_by: creator,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Card and position are untouched.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        apply_field(patch.title, &mut self.title);
        patch.description.apply_to(&mut self.description);
        apply_field(patch.priority, &mut self.priority);
        apply_field(patch.status, &mut self.status);
        patch.deadline.apply_to(&mut self.deadline);
        self.updated_at = now;
    }
}

impl Positioned for Task {
    type Id = TaskId;

    fn id(&self) -> TaskId {
        self.id
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

/// Partial task update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Clearable<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub deadline: Clearable<DateTime<Utc>>,
}
