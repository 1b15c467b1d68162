//! Response bodies and OpenAPI schemas.
//!
//! Domain types stay free of serde and utoipa; handlers convert them into the
//! camelCase bodies defined here.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::RebalanceOutcome;
use crate::domain::{Board, Card, Task, User};

/// OpenAPI schema for the failure codes.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "INVALID_INPUT")]
    InvalidInput,
    #[schema(rename = "UNAUTHORIZED")]
    Unauthorized,
    #[schema(rename = "FORBIDDEN")]
    Forbidden,
    #[schema(rename = "NOT_FOUND")]
    NotFound,
    #[schema(rename = "SERVER_ERROR")]
    ServerError,
}

/// OpenAPI schema for [`super::error::ErrorEnvelope`].
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope, rename_all = "camelCase")]
#[expect(dead_code, reason = "used only for OpenAPI schema generation")]
pub struct ErrorSchema {
    #[schema(example = false)]
    success: bool,
    #[schema(example = "Not a board member")]
    error: String,
    code: ErrorCodeSchema,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for an [`Envelope`] carrying only a message.
#[derive(ToSchema)]
#[schema(as = MessageEnvelope)]
#[expect(dead_code, reason = "used only for OpenAPI schema generation")]
pub struct MessageSchema {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "Board deleted successfully")]
    message: String,
}

/// Success envelope: `{success: true, data?, message?}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Envelope carrying `data`.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    /// Envelope with a message and no data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub github_id: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            github_id: user.github_id,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(format = "uuid")]
    pub owner_id: String,
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub member_ids: Vec<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Board> for BoardBody {
    fn from(board: Board) -> Self {
        Self {
            id: board.id.to_string(),
            name: board.name,
            description: board.description,
            owner_id: board.owner_id.to_string(),
            member_ids: board.member_ids.iter().map(ToString::to_string).collect(),
            created_at: board.created_at.to_rfc3339(),
            updated_at: board.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub board_id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "backlog")]
    pub status: String,
    pub position: f64,
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub member_ids: Vec<String>,
    pub tasks_count: u32,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Card> for CardBody {
    fn from(card: Card) -> Self {
        Self {
            id: card.id.to_string(),
            board_id: card.board_id.to_string(),
            name: card.name,
            description: card.description,
            status: card.status.as_str().to_owned(),
            position: card.position,
            member_ids: card.member_ids.iter().map(ToString::to_string).collect(),
            tasks_count: card.tasks_count,
            created_at: card.created_at.to_rfc3339(),
            updated_at: card.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub card_id: String,
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "medium")]
    pub priority: String,
    #[schema(example = "todo")]
    pub status: String,
    #[schema(format = "date-time")]
    pub deadline: Option<String>,
    pub position: f64,
    #[schema(format = "uuid")]
    pub assigned_to: Option<String>,
    #[schema(format = "uuid")]
    pub created_by: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Task> for TaskBody {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            card_id: task.card_id.to_string(),
            title: task.title,
            description: task.description,
            priority: task.priority.as_str().to_owned(),
            status: task.status.as_str().to_owned(),
            deadline: task.deadline.map(|deadline| deadline.to_rfc3339()),
            position: task.position,
            assigned_to: task.assigned_to.map(|id| id.to_string()),
            created_by: task.created_by.to_string(),
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

/// Result of a rebalance request.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct RebalanceBody {
    /// Members given new positions; zero when nothing needed fixing.
    pub renumbered: usize,
}

impl From<RebalanceOutcome> for RebalanceBody {
    fn from(outcome: RebalanceOutcome) -> Self {
        Self {
            renumbered: outcome.renumbered,
        }
    }
}
