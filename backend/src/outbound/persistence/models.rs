//! Internal Diesel row structs and their domain conversions.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    Board, BoardId, BoardPatch, Card, CardId, CardPatch, CardStatus, CodePurpose, EmailAddress,
    OneTimeCode, Task, TaskId, TaskPatch, TaskPriority, TaskStatus, User, UserId,
};

use super::schema::{boards, cards, one_time_codes, tasks, users};

fn user_ids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

fn to_user_ids(ids: Vec<Uuid>) -> Vec<UserId> {
    ids.into_iter().map(UserId::from_uuid).collect()
}

fn count_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| {
        warn!(value, "negative task count in storage, treating as zero");
        0
    })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub github_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert to a domain user; fails only on a corrupt stored email.
    pub(crate) fn into_user(self) -> Result<User, String> {
        let email = EmailAddress::new(&self.email)
            .map_err(|err| format!("stored email for user {} is invalid: {err}", self.id))?;
        Ok(User {
            id: UserId::from_uuid(self.id),
            email,
            display_name: self.display_name,
            avatar_url: self.avatar_url,
            github_id: self.github_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub avatar_url: Option<&'a str>,
    pub github_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            display_name: &user.display_name,
            avatar_url: user.avatar_url.as_deref(),
            github_id: user.github_id.as_deref(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BoardRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BoardRow> for Board {
    fn from(row: BoardRow) -> Self {
        Self {
            id: BoardId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            owner_id: UserId::from_uuid(row.owner_id),
            member_ids: to_user_ids(row.member_ids),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = boards)]
pub(crate) struct NewBoardRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub owner_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Board> for NewBoardRow<'a> {
    fn from(board: &'a Board) -> Self {
        Self {
            id: *board.id.as_uuid(),
            name: &board.name,
            description: board.description.as_deref(),
            owner_id: *board.owner_id.as_uuid(),
            member_ids: user_ids(&board.member_ids),
            created_at: board.created_at,
            updated_at: board.updated_at,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = boards)]
pub(crate) struct BoardChanges<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> BoardChanges<'a> {
    pub(crate) fn new(patch: &'a BoardPatch, at: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.as_deref(),
            description: patch.description.as_nullable().map(|d| d.map(String::as_str)),
            updated_at: at,
        }
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CardRow {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub position: f64,
    pub member_ids: Vec<Uuid>,
    pub tasks_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        let status = row.status.parse().unwrap_or_else(|_| {
            warn!(
                value = %row.status,
                card_id = %row.id,
                "unrecognised card status, defaulting to backlog"
            );
            CardStatus::default()
        });
        Self {
            id: CardId::from_uuid(row.id),
            board_id: BoardId::from_uuid(row.board_id),
            name: row.name,
            description: row.description,
            status,
            position: row.position,
            member_ids: to_user_ids(row.member_ids),
            tasks_count: count_from_db(row.tasks_count),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub(crate) struct NewCardRow<'a> {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub status: &'static str,
    pub position: f64,
    pub member_ids: Vec<Uuid>,
    pub tasks_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Card> for NewCardRow<'a> {
    fn from(card: &'a Card) -> Self {
        Self {
            id: *card.id.as_uuid(),
            board_id: *card.board_id.as_uuid(),
            name: &card.name,
            description: card.description.as_deref(),
            status: card.status.as_str(),
            position: card.position,
            member_ids: user_ids(&card.member_ids),
            tasks_count: i32::try_from(card.tasks_count).unwrap_or(i32::MAX),
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cards)]
pub(crate) struct CardChanges<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> CardChanges<'a> {
    pub(crate) fn new(patch: &'a CardPatch, at: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.as_deref(),
            description: patch.description.as_nullable().map(|d| d.map(String::as_str)),
            updated_at: at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub card_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub deadline: Option<DateTime<Utc>>,
    pub position: f64,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        let priority = row.priority.parse().unwrap_or_else(|_| {
            warn!(value = %row.priority, task_id = %row.id, "unrecognised task priority");
            TaskPriority::default()
        });
        let status = row.status.parse().unwrap_or_else(|_| {
            warn!(value = %row.status, task_id = %row.id, "unrecognised task status");
            TaskStatus::default()
        });
        Self {
            id: TaskId::from_uuid(row.id),
            card_id: CardId::from_uuid(row.card_id),
            title: row.title,
            description: row.description,
            priority,
            status,
            deadline: row.deadline,
            position: row.position,
            assigned_to: row.assigned_to.map(UserId::from_uuid),
            created_by: UserId::from_uuid(row.created_by),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub(crate) struct NewTaskRow<'a> {
    pub id: Uuid,
    pub card_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub priority: &'static str,
    pub status: &'static str,
    pub deadline: Option<DateTime<Utc>>,
    pub position: f64,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Task> for NewTaskRow<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: *task.id.as_uuid(),
            card_id: *task.card_id.as_uuid(),
            title: &task.title,
            description: task.description.as_deref(),
            priority: task.priority.as_str(),
            status: task.status.as_str(),
            deadline: task.deadline,
            position: task.position,
            assigned_to: task.assigned_to.map(|id| *id.as_uuid()),
            created_by: *task.created_by.as_uuid(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub(crate) struct TaskChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub priority: Option<&'static str>,
    pub status: Option<&'static str>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> TaskChanges<'a> {
    pub(crate) fn new(patch: &'a TaskPatch, at: DateTime<Utc>) -> Self {
        Self {
            title: patch.title.as_deref(),
            description: patch.description.as_nullable().map(|d| d.map(String::as_str)),
            priority: patch.priority.map(TaskPriority::as_str),
            status: patch.status.map(TaskStatus::as_str),
            deadline: patch.deadline.as_nullable().map(|d| d.copied()),
            updated_at: at,
        }
    }
}

// ---------------------------------------------------------------------------
// One-time codes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = one_time_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OneTimeCodeRow {
    pub purpose: String,
    pub subject: String,
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCodeRow {
    /// Convert to a domain code; fails only on an unknown stored purpose.
    pub(crate) fn into_code(self) -> Result<OneTimeCode, String> {
        let purpose = CodePurpose::from_storage(&self.purpose)
            .ok_or_else(|| format!("stored code purpose `{}` is unknown", self.purpose))?;
        Ok(OneTimeCode {
            purpose,
            subject: self.subject,
            digest: self.digest,
            expires_at: self.expires_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = one_time_codes)]
pub(crate) struct NewOneTimeCodeRow<'a> {
    pub purpose: &'static str,
    pub subject: &'a str,
    pub digest: &'a str,
    pub expires_at: DateTime<Utc>,
}

impl<'a> From<&'a OneTimeCode> for NewOneTimeCodeRow<'a> {
    fn from(code: &'a OneTimeCode) -> Self {
        Self {
            purpose: code.purpose.as_str(),
            subject: &code.subject,
            digest: &code.digest,
            expires_at: code.expires_at,
        }
    }
}
