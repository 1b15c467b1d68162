//! Port for user account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, GitHubLink, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by linked GitHub account id.
    async fn find_by_github_id(
        &self,
        github_id: &str,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Persist a new account.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Attach a GitHub identity to an existing account.
    async fn link_github(
        &self,
        id: &UserId,
        link: &GitHubLink,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError>;
}
