//! Shared Diesel and pool error mapping for the repository adapters.
//!
//! Every repository port error exposes `connection` and `query` variants; this
//! module maps infrastructure failures onto them once.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    BoardRepositoryError, CardRepositoryError, TaskRepositoryError, UserRepositoryError,
    VerificationCodeRepositoryError,
};

use super::pool::PoolError;

/// Repository error with connection and query failure variants.
pub(crate) trait StorageError: Sized {
    /// The store could not be reached.
    fn connection_failed(message: String) -> Self;
    /// A statement failed.
    fn query_failed(message: String) -> Self;

    /// Map a pool checkout or build failure.
    fn from_pool(error: PoolError) -> Self {
        let message = match error {
            PoolError::Checkout { message } | PoolError::Build { message } => message,
        };
        Self::connection_failed(message)
    }

    /// Map a Diesel failure, logging driver detail at debug level only.
    fn from_diesel(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(error = %error, "diesel operation failed"),
        }

        match error {
            DieselError::NotFound => Self::query_failed("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => {
                Self::query_failed("database query error".to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::connection_failed("database connection error".to_owned())
            }
            _ => Self::query_failed("database error".to_owned()),
        }
    }
}

macro_rules! storage_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl StorageError for $error {
                fn connection_failed(message: String) -> Self {
                    Self::connection(message)
                }

                fn query_failed(message: String) -> Self {
                    Self::query(message)
                }
            }
        )*
    };
}

storage_error!(
    BoardRepositoryError,
    CardRepositoryError,
    TaskRepositoryError,
    UserRepositoryError,
    VerificationCodeRepositoryError,
);

/// Whether a Diesel error is a unique-constraint violation on `constraint`.
pub(crate) fn is_unique_violation(error: &DieselError, constraint: &str) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(constraint)
    )
}
