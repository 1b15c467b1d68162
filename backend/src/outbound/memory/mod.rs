//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by integration tests. A single
//! mutex guards all tables, so each port call is atomic, including cascades
//! and task counter updates.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    BoardRepository, BoardRepositoryError, CardRepository, CardRepositoryError, TaskRelocation,
    TaskRepository, TaskRepositoryError, UserRepository, UserRepositoryError,
    VerificationCodeRepository, VerificationCodeRepositoryError,
};
use crate::domain::{
    Board, BoardId, BoardPatch, Card, CardId, CardPatch, CardStatus, CodePurpose, EmailAddress,
    GitHubLink, OneTimeCode, Task, TaskId, TaskPatch, User, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    boards: HashMap<BoardId, Board>,
    cards: HashMap<CardId, Card>,
    tasks: HashMap<TaskId, Task>,
    codes: HashMap<(CodePurpose, String), OneTimeCode>,
}

impl Tables {
    fn bump_count(&mut self, card_id: &CardId, delta: i64) {
        if let Some(card) = self.cards.get_mut(card_id) {
            let next = i64::from(card.tasks_count).saturating_add(delta).max(0);
            card.tasks_count = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    fn remove_card(&mut self, card_id: &CardId) -> bool {
        self.tasks.retain(|_, task| &task.card_id != card_id);
        self.cards.remove(card_id).is_some()
    }
}

/// Shared in-memory backing store.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl BoardRepository for InMemoryStore {
    async fn insert(&self, board: &Board) -> Result<(), BoardRepositoryError> {
        let mut tables = self.tables().map_err(BoardRepositoryError::query)?;
        tables.boards.insert(board.id, board.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
        let tables = self.tables().map_err(BoardRepositoryError::query)?;
        Ok(tables.boards.get(id).cloned())
    }

    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Board>, BoardRepositoryError> {
        let tables = self.tables().map_err(BoardRepositoryError::query)?;
        let mut boards: Vec<Board> = tables
            .boards
            .values()
            .filter(|board| board.is_member(user))
            .cloned()
            .collect();
        boards.sort_by_key(|board| board.created_at);
        Ok(boards)
    }

    async fn update(
        &self,
        id: &BoardId,
        patch: &BoardPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let mut tables = self.tables().map_err(BoardRepositoryError::query)?;
        Ok(tables.boards.get_mut(id).map(|board| {
            board.apply(patch.clone(), at);
            board.clone()
        }))
    }

    async fn add_member(
        &self,
        id: &BoardId,
        user: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let mut tables = self.tables().map_err(BoardRepositoryError::query)?;
        Ok(tables.boards.get_mut(id).map(|board| {
            if !board.is_member(user) {
                board.add_member(*user);
                board.updated_at = at;
            }
            board.clone()
        }))
    }

    async fn delete(&self, id: &BoardId) -> Result<bool, BoardRepositoryError> {
        let mut tables = self.tables().map_err(BoardRepositoryError::query)?;
        let card_ids: Vec<CardId> = tables
            .cards
            .values()
            .filter(|card| &card.board_id == id)
            .map(|card| card.id)
            .collect();
        for card_id in &card_ids {
            tables.remove_card(card_id);
        }
        Ok(tables.boards.remove(id).is_some())
    }
}

#[async_trait]
impl CardRepository for InMemoryStore {
    async fn insert(&self, card: &Card) -> Result<(), CardRepositoryError> {
        let mut tables = self.tables().map_err(CardRepositoryError::query)?;
        tables.cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, CardRepositoryError> {
        let tables = self.tables().map_err(CardRepositoryError::query)?;
        Ok(tables.cards.get(id).cloned())
    }

    async fn list_by_board(&self, board_id: &BoardId) -> Result<Vec<Card>, CardRepositoryError> {
        let tables = self.tables().map_err(CardRepositoryError::query)?;
        Ok(tables
            .cards
            .values()
            .filter(|card| &card.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn list_by_board_and_member(
        &self,
        board_id: &BoardId,
        member: &UserId,
    ) -> Result<Vec<Card>, CardRepositoryError> {
        let tables = self.tables().map_err(CardRepositoryError::query)?;
        Ok(tables
            .cards
            .values()
            .filter(|card| &card.board_id == board_id && card.member_ids.contains(member))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &CardId,
        patch: &CardPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Card>, CardRepositoryError> {
        let mut tables = self.tables().map_err(CardRepositoryError::query)?;
        Ok(tables.cards.get_mut(id).map(|card| {
            card.apply(patch.clone(), at);
            card.clone()
        }))
    }

    async fn place(
        &self,
        id: &CardId,
        status: CardStatus,
        position: f64,
        at: DateTime<Utc>,
    ) -> Result<Option<Card>, CardRepositoryError> {
        let mut tables = self.tables().map_err(CardRepositoryError::query)?;
        Ok(tables.cards.get_mut(id).map(|card| {
            card.status = status;
            card.position = position;
            card.updated_at = at;
            card.clone()
        }))
    }

    async fn reposition(
        &self,
        moves: &[(CardId, f64)],
        at: DateTime<Utc>,
    ) -> Result<(), CardRepositoryError> {
        let mut tables = self.tables().map_err(CardRepositoryError::query)?;
        for (id, position) in moves {
            if let Some(card) = tables.cards.get_mut(id) {
                card.position = *position;
                card.updated_at = at;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &CardId) -> Result<bool, CardRepositoryError> {
        let mut tables = self.tables().map_err(CardRepositoryError::query)?;
        Ok(tables.remove_card(id))
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn insert(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut tables = self.tables().map_err(TaskRepositoryError::query)?;
        tables.tasks.insert(task.id, task.clone());
        tables.bump_count(&task.card_id, 1);
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let tables = self.tables().map_err(TaskRepositoryError::query)?;
        Ok(tables.tasks.get(id).cloned())
    }

    async fn list_by_card(&self, card_id: &CardId) -> Result<Vec<Task>, TaskRepositoryError> {
        let tables = self.tables().map_err(TaskRepositoryError::query)?;
        Ok(tables
            .tasks
            .values()
            .filter(|task| &task.card_id == card_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut tables = self.tables().map_err(TaskRepositoryError::query)?;
        Ok(tables.tasks.get_mut(id).map(|task| {
            task.apply(patch.clone(), at);
            task.clone()
        }))
    }

    async fn assign(
        &self,
        id: &TaskId,
        member: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut tables = self.tables().map_err(TaskRepositoryError::query)?;
        Ok(tables.tasks.get_mut(id).map(|task| {
            task.assigned_to = Some(*member);
            task.updated_at = at;
            task.clone()
        }))
    }

    async fn relocate(
        &self,
        relocation: &TaskRelocation,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut tables = self.tables().map_err(TaskRepositoryError::query)?;
        let Some(task) = tables
            .tasks
            .get_mut(&relocation.task_id)
            .filter(|task| task.card_id == relocation.from_card)
        else {
            return Ok(None);
        };
        task.card_id = relocation.to_card;
        task.position = relocation.position;
        task.updated_at = relocation.at;
        let moved = task.clone();

        if relocation.crosses_cards() {
            tables.bump_count(&relocation.from_card, -1);
            tables.bump_count(&relocation.to_card, 1);
        }
        Ok(Some(moved))
    }

    async fn reposition(
        &self,
        moves: &[(TaskId, f64)],
        at: DateTime<Utc>,
    ) -> Result<(), TaskRepositoryError> {
        let mut tables = self.tables().map_err(TaskRepositoryError::query)?;
        for (id, position) in moves {
            if let Some(task) = tables.tasks.get_mut(id) {
                task.position = *position;
                task.updated_at = at;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, TaskRepositoryError> {
        let mut tables = self.tables().map_err(TaskRepositoryError::query)?;
        let Some(task) = tables.tasks.remove(id) else {
            return Ok(false);
        };
        tables.bump_count(&task.card_id, -1);
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables().map_err(UserRepositoryError::query)?;
        Ok(tables.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables().map_err(UserRepositoryError::query)?;
        Ok(tables.users.values().find(|user| &user.email == email).cloned())
    }

    async fn find_by_github_id(
        &self,
        github_id: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables().map_err(UserRepositoryError::query)?;
        Ok(tables
            .users
            .values()
            .find(|user| user.github_id.as_deref() == Some(github_id))
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables().map_err(UserRepositoryError::query)?;
        if tables.users.values().any(|existing| existing.email == user.email) {
            return Err(UserRepositoryError::duplicate_email(user.email.as_ref()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn link_github(
        &self,
        id: &UserId,
        link: &GitHubLink,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut tables = self.tables().map_err(UserRepositoryError::query)?;
        Ok(tables.users.get_mut(id).map(|user| {
            user.github_id = Some(link.github_id.clone());
            user.avatar_url.clone_from(&link.avatar_url);
            user.updated_at = at;
            user.clone()
        }))
    }
}

#[async_trait]
impl VerificationCodeRepository for InMemoryStore {
    async fn store(&self, code: &OneTimeCode) -> Result<(), VerificationCodeRepositoryError> {
        let mut tables = self.tables().map_err(VerificationCodeRepositoryError::query)?;
        tables
            .codes
            .insert((code.purpose, code.subject.clone()), code.clone());
        Ok(())
    }

    async fn consume(
        &self,
        purpose: CodePurpose,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, VerificationCodeRepositoryError> {
        let mut tables = self.tables().map_err(VerificationCodeRepositoryError::query)?;
        let key = tables
            .codes
            .iter()
            .find(|(_, code)| code.purpose == purpose && code.digest == digest)
            .map(|(key, _)| key.clone());
        Ok(key
            .and_then(|key| tables.codes.remove(&key))
            .filter(|code| code.is_live(now)))
    }
}
