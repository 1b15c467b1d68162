//! Cards: the lists of a board, each sitting in one status lane.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::ordering::Positioned;
use super::patch::{Clearable, apply_field};
use super::{BoardId, CardId, UserId};

/// Status lane a card currently occupies.
///
/// Any lane is reachable from any other in one move.
///
/// # Examples
/// ```
/// use taskboard::domain::CardStatus;
///
/// let status: CardStatus = "review".parse().unwrap();
/// assert_eq!(status, CardStatus::Review);
/// assert_eq!(CardStatus::Ongoing.as_str(), "ongoing");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardStatus {
    Icebox,
    /// Lane that receives newly created cards.
    #[default]
    Backlog,
    Ongoing,
    Review,
    Done,
}

impl CardStatus {
    /// Every lane in board order.
    pub const ALL: [Self; 5] = [
        Self::Icebox,
        Self::Backlog,
        Self::Ongoing,
        Self::Review,
        Self::Done,
    ];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Icebox => "icebox",
            Self::Backlog => "backlog",
            Self::Ongoing => "ongoing",
            Self::Review => "review",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown lane name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown card status: {input}")]
pub struct ParseCardStatusError {
    /// The unrecognised input value.
    pub input: String,
}

impl FromStr for CardStatus {
    type Err = ParseCardStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseCardStatusError {
                input: s.to_owned(),
            })
    }
}

/// A list on a board holding ordered tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub name: String,
    pub description: Option<String>,
    pub status: CardStatus,
    pub position: f64,
    pub member_ids: Vec<UserId>,
    /// Number of live tasks referencing this card, maintained incrementally.
    pub tasks_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// New backlog card created by `creator` at `position`.
    #[must_use]
    pub fn create(
        board_id: BoardId,
        draft: CardDraft,
        creator: UserId,
        position: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CardId::random(),
            board_id,
            name: draft.name,
            description: draft.description,
            status: CardStatus::Backlog,
            position,
            member_ids: vec![creator],
            tasks_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Status and position are untouched.
    pub fn apply(&mut self, patch: CardPatch, now: DateTime<Utc>) {
        apply_field(patch.name, &mut self.name);
        patch.description.apply_to(&mut self.description);
        self.updated_at = now;
    }
}

impl Positioned for Card {
    type Id = CardId;

    fn id(&self) -> CardId {
        self.id
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Fields supplied when creating a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub name: String,
    pub description: Option<String>,
}

/// Partial card update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardPatch {
    pub name: Option<String>,
    pub description: Clearable<String>,
}
