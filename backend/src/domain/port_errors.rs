//! Translation of driven-port failures into domain errors.
//!
//! Adapter details are logged here and never reach clients; every storage or
//! upstream failure surfaces as a server error.

use tracing::error;

use super::Error;
use super::ports::{
    BoardRepositoryError, CardRepositoryError, GitHubIdentityError, MailerError,
    TaskRepositoryError, UserRepositoryError, VerificationCodeRepositoryError,
};

macro_rules! internal_from {
    ($($source:ty => $label:literal),* $(,)?) => {
        $(
            impl From<$source> for Error {
                fn from(source: $source) -> Self {
                    error!(error = %source, concat!($label, " failed"));
                    Error::internal(concat!($label, " failed"))
                }
            }
        )*
    };
}

internal_from! {
    BoardRepositoryError => "board storage",
    CardRepositoryError => "card storage",
    TaskRepositoryError => "task storage",
    VerificationCodeRepositoryError => "verification code storage",
    MailerError => "verification email delivery",
}

impl From<UserRepositoryError> for Error {
    fn from(source: UserRepositoryError) -> Self {
        match source {
            UserRepositoryError::DuplicateEmail { email } => {
                Self::invalid_input(format!("email already registered: {email}"))
            }
            other => {
                error!(error = %other, "user storage failed");
                Self::internal("user storage failed")
            }
        }
    }
}

impl From<GitHubIdentityError> for Error {
    fn from(source: GitHubIdentityError) -> Self {
        error!(error = %source, "github sign-in failed");
        Self::unauthorized("GitHub authentication failed")
    }
}
