//! Driving ports for sign-up, sign-in, and profile lookup.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Outcome of requesting a sign-up code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignUpCodeSent {
    /// Whether the email already belongs to an account.
    pub is_existing_user: bool,
}

/// Email one-time-code authentication.
#[async_trait]
pub trait EmailAuthCommand: Send + Sync {
    /// Email a code to a prospective or existing user.
    async fn request_sign_up_code(&self, email: &str) -> Result<SignUpCodeSent, Error>;

    /// Verify a code and return the account, creating it when new.
    async fn sign_up(&self, email: &str, code: &str) -> Result<User, Error>;

    /// Email a code to an existing user.
    async fn request_sign_in_code(&self, email: &str) -> Result<(), Error>;

    /// Verify a code for an existing user.
    async fn sign_in(&self, email: &str, code: &str) -> Result<User, Error>;
}

/// GitHub OAuth sign-in.
#[async_trait]
pub trait GitHubAuthCommand: Send + Sync {
    /// URL that starts the OAuth flow.
    fn authorization_url(&self) -> String;

    /// Resolve the callback code to an account and issue an exchange code.
    async fn complete_callback(&self, code: &str) -> Result<String, Error>;

    /// Redeem an exchange code for the account it was issued to.
    async fn exchange(&self, code: &str) -> Result<User, Error>;
}

/// Profile lookup for the signed-in user.
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Fetch the account behind a session.
    async fn me(&self, user_id: UserId) -> Result<User, Error>;
}
