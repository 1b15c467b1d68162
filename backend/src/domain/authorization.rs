//! Board membership checks shared by every board, card, and task operation.

use super::{Board, Error, UserId};

/// Fail with `Forbidden` unless `user` is in the board's member set.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use taskboard::domain::authorization::require_member;
/// use taskboard::domain::{Board, BoardDraft, ErrorCode, UserId};
///
/// let owner = UserId::random();
/// let board = Board::create(
///     BoardDraft { name: "Ops".into(), description: None },
///     owner,
///     Utc::now(),
/// );
/// assert!(require_member(&board, &owner).is_ok());
/// let err = require_member(&board, &UserId::random()).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// ```
pub fn require_member(board: &Board, user: &UserId) -> Result<(), Error> {
    if board.is_member(user) {
        Ok(())
    } else {
        Err(Error::forbidden("Not a board member"))
    }
}

/// Fail with `Forbidden` unless `user` owns the board.
pub fn require_owner(board: &Board, user: &UserId) -> Result<(), Error> {
    if board.is_owner(user) {
        Ok(())
    } else {
        Err(Error::forbidden("Only the board owner can perform this action"))
    }
}
