//! GitHub OAuth sign-in.
//!
//! The callback resolves the GitHub account to a local user and hands the
//! frontend a short-lived exchange code; the frontend trades that code for a
//! session through [`GitHubAuthCommand::exchange`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    GitHubAuthCommand, GitHubIdentityProvider, UserRepository, VerificationCodeRepository,
};
use crate::domain::{
    CodePurpose, EmailAddress, Error, GitHubProfile, OneTimeCode, User, UserId, code_digest,
    generate_exchange_code,
};

/// Lifetime of an exchange code, in seconds.
pub const EXCHANGE_CODE_TTL_SECS: i64 = 30;

// Exchange codes are random and unscoped; the subject is recovered from the
// stored record.
const EXCHANGE_SCOPE: &str = "";

/// GitHub sign-in service implementing [`GitHubAuthCommand`].
#[derive(Clone)]
pub struct GitHubAuthService<P, U, V> {
    provider: Arc<P>,
    users: Arc<U>,
    codes: Arc<V>,
    clock: Arc<dyn Clock>,
    exchange_ttl: Duration,
}

impl<P, U, V> GitHubAuthService<P, U, V> {
    /// Create a service over the identity provider and account storage.
    pub fn new(provider: Arc<P>, users: Arc<U>, codes: Arc<V>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            users,
            codes,
            clock,
            exchange_ttl: Duration::seconds(EXCHANGE_CODE_TTL_SECS),
        }
    }

    /// Override the exchange code lifetime.
    #[must_use]
    pub fn with_exchange_ttl(mut self, exchange_ttl: Duration) -> Self {
        self.exchange_ttl = exchange_ttl;
        self
    }
}

impl<P, U, V> GitHubAuthService<P, U, V>
where
    P: GitHubIdentityProvider,
    U: UserRepository,
    V: VerificationCodeRepository,
{
    /// Find the account for a GitHub profile: by GitHub id, then by email
    /// (linking it), else register a new one.
    async fn resolve_user(&self, profile: &GitHubProfile) -> Result<User, Error> {
        if let Some(user) = self.users.find_by_github_id(&profile.id).await? {
            return Ok(user);
        }

        let now = self.clock.utc();
        let email = EmailAddress::new(profile.email_or_placeholder())
            .or_else(|_| EmailAddress::new(format!("{}@github.local", profile.login)))
            .map_err(|_| Error::invalid_input("GitHub account has no usable email"))?;

        if let Some(existing) = self.users.find_by_email(&email).await? {
            info!(user_id = %existing.id, "linking GitHub account to existing user");
            return self
                .users
                .link_github(&existing.id, &profile.link(), now)
                .await?
                .ok_or_else(|| Error::not_found("User not found"));
        }

        let mut user = User::from_email(email, now);
        user.display_name = profile.display_name();
        user.github_id = Some(profile.id.clone());
        user.avatar_url.clone_from(&profile.avatar_url);
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "account created from GitHub profile");
        Ok(user)
    }
}

#[async_trait]
impl<P, U, V> GitHubAuthCommand for GitHubAuthService<P, U, V>
where
    P: GitHubIdentityProvider,
    U: UserRepository,
    V: VerificationCodeRepository,
{
    fn authorization_url(&self) -> String {
        self.provider.authorization_url()
    }

    async fn complete_callback(&self, code: &str) -> Result<String, Error> {
        if code.trim().is_empty() {
            return Err(Error::invalid_input("Missing authorization code"));
        }
        let profile = self.provider.fetch_profile(code).await?;
        let user = self.resolve_user(&profile).await?;

        let exchange = generate_exchange_code();
        let record = OneTimeCode {
            purpose: CodePurpose::GitHubExchange,
            subject: user.id.to_string(),
            digest: code_digest(CodePurpose::GitHubExchange, EXCHANGE_SCOPE, &exchange),
            expires_at: self.clock.utc() + self.exchange_ttl,
        };
        self.codes.store(&record).await?;
        Ok(exchange.as_str().to_owned())
    }

    async fn exchange(&self, code: &str) -> Result<User, Error> {
        let digest = code_digest(CodePurpose::GitHubExchange, EXCHANGE_SCOPE, code.trim());
        let record = self
            .codes
            .consume(CodePurpose::GitHubExchange, &digest, self.clock.utc())
            .await?
            .ok_or_else(|| Error::unauthorized("Invalid or expired exchange code"))?;
        let user_id = UserId::new(&record.subject)
            .map_err(|err| Error::internal(format!("corrupt exchange code subject: {err}")))?;
        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
#[path = "github_auth_service_tests.rs"]
mod tests;
