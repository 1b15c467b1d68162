//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{Board, BoardDraft, BoardId, Card, CardDraft, CardId, Task, TaskDraft, UserId};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

/// Board owned by `owner` with `members` added.
pub(crate) fn board_with(owner: UserId, members: &[UserId]) -> Board {
    let mut board = Board::create(
        BoardDraft {
            name: "Launch".to_owned(),
            description: None,
        },
        owner,
        fixture_timestamp(),
    );
    for member in members {
        board.add_member(*member);
    }
    board
}

pub(crate) fn card_at(board_id: BoardId, creator: UserId, position: f64) -> Card {
    Card::create(
        board_id,
        CardDraft {
            name: format!("card at {position}"),
            description: None,
        },
        creator,
        position,
        fixture_timestamp(),
    )
}

pub(crate) fn task_at(card_id: CardId, creator: UserId, position: f64) -> Task {
    Task::create(
        card_id,
        TaskDraft {
            title: format!("task at {position}"),
            ..TaskDraft::default()
        },
        creator,
        position,
        fixture_timestamp(),
    )
}
