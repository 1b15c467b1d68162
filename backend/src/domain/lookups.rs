//! Existence and membership lookups shared by the ordering services.

use super::authorization::require_member;
use super::ports::{BoardRepository, CardRepository, TaskRepository};
use super::{Board, BoardId, Card, CardId, Error, Task, TaskId, UserId};

pub(crate) fn board_not_found() -> Error {
    Error::not_found("Board not found")
}

pub(crate) fn card_not_found() -> Error {
    Error::not_found("Card not found")
}

pub(crate) fn task_not_found() -> Error {
    Error::not_found("Task not found")
}

/// Load a board the actor belongs to.
pub(crate) async fn member_board<B>(
    boards: &B,
    board_id: &BoardId,
    actor: &UserId,
) -> Result<Board, Error>
where
    B: BoardRepository + ?Sized,
{
    let board = boards
        .find_by_id(board_id)
        .await?
        .ok_or_else(board_not_found)?;
    require_member(&board, actor)?;
    Ok(board)
}

/// Load a card, treating a card on another board as missing.
pub(crate) async fn card_on_board<C>(
    cards: &C,
    board_id: &BoardId,
    card_id: &CardId,
) -> Result<Card, Error>
where
    C: CardRepository + ?Sized,
{
    cards
        .find_by_id(card_id)
        .await?
        .filter(|card| &card.board_id == board_id)
        .ok_or_else(card_not_found)
}

/// Load a task, treating a task in another card as missing.
pub(crate) async fn task_in_card<T>(
    tasks: &T,
    card_id: &CardId,
    task_id: &TaskId,
) -> Result<Task, Error>
where
    T: TaskRepository + ?Sized,
{
    tasks
        .find_by_id(task_id)
        .await?
        .filter(|task| &task.card_id == card_id)
        .ok_or_else(task_not_found)
}
