//! Strongly typed identifiers for boards, cards, tasks, and users.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Validation failure for identifier text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier was not a UUID.
    #[error("identifier must be a valid UUID")]
    Malformed,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse and validate identifier text.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
                raw.as_ref().parse()
            }

            /// Generate a random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                if raw.is_empty() {
                    return Err(IdError::Empty);
                }
                if raw.trim() != raw {
                    return Err(IdError::Malformed);
                }
                Uuid::parse_str(raw).map(Self).map_err(|_| IdError::Malformed)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id! {
    /// Identifier of a board.
    BoardId
}

define_id! {
    /// Identifier of a card (a list within a board).
    CardId
}

define_id! {
    /// Identifier of a task within a card.
    TaskId
}

define_id! {
    /// Identifier of a registered user.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    UserId
}
