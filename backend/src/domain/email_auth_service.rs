//! Email one-time-code sign-up and sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    EmailAuthCommand, Mailer, SignUpCodeSent, UserRepository, VerificationCodeRepository,
};
use crate::domain::{
    CodePurpose, EmailAddress, Error, OneTimeCode, User, VerificationCode, code_digest,
};

/// Lifetime of a mailed verification code, in seconds.
pub const EMAIL_CODE_TTL_SECS: i64 = 60;

fn invalid_email(raw: &str) -> Error {
    Error::invalid_input("Invalid email address").with_details(json!({
        "field": "email",
        "value": raw,
        "code": "invalid_email",
    }))
}

fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|_| invalid_email(raw))
}

/// Email authentication service implementing [`EmailAuthCommand`].
#[derive(Clone)]
pub struct EmailAuthService<U, V, M> {
    users: Arc<U>,
    codes: Arc<V>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    code_ttl: Duration,
}

impl<U, V, M> EmailAuthService<U, V, M> {
    /// Create a service issuing codes valid for [`EMAIL_CODE_TTL_SECS`].
    pub fn new(users: Arc<U>, codes: Arc<V>, mailer: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            codes,
            mailer,
            clock,
            code_ttl: Duration::seconds(EMAIL_CODE_TTL_SECS),
        }
    }

    /// Override the code lifetime.
    #[must_use]
    pub fn with_code_ttl(mut self, code_ttl: Duration) -> Self {
        self.code_ttl = code_ttl;
        self
    }
}

impl<U, V, M> EmailAuthService<U, V, M>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    M: Mailer,
{
    async fn issue_code(&self, email: &EmailAddress) -> Result<(), Error> {
        let code = VerificationCode::generate();
        let record = OneTimeCode {
            purpose: CodePurpose::EmailVerification,
            subject: email.to_string(),
            digest: code_digest(CodePurpose::EmailVerification, email.as_ref(), code.expose()),
            expires_at: self.clock.utc() + self.code_ttl,
        };
        self.codes.store(&record).await?;
        self.mailer.send_verification_code(email, code.expose()).await?;
        debug!(%email, "verification code issued");
        Ok(())
    }

    async fn redeem(&self, email: &EmailAddress, raw_code: &str) -> Result<(), Error> {
        let code = VerificationCode::parse(raw_code).map_err(|err| {
            Error::invalid_input(err.to_string()).with_details(json!({
                "field": "verificationCode",
                "code": "invalid_verification_code",
            }))
        })?;
        let digest = code_digest(CodePurpose::EmailVerification, email.as_ref(), code.expose());
        self.codes
            .consume(CodePurpose::EmailVerification, &digest, self.clock.utc())
            .await?
            .filter(|record| record.subject == email.as_ref())
            .map(|_| ())
            .ok_or_else(|| Error::unauthorized("Invalid or expired verification code"))
    }
}

#[async_trait]
impl<U, V, M> EmailAuthCommand for EmailAuthService<U, V, M>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    M: Mailer,
{
    async fn request_sign_up_code(&self, email: &str) -> Result<SignUpCodeSent, Error> {
        let email = parse_email(email)?;
        let is_existing_user = self.users.find_by_email(&email).await?.is_some();
        self.issue_code(&email).await?;
        Ok(SignUpCodeSent { is_existing_user })
    }

    async fn sign_up(&self, email: &str, code: &str) -> Result<User, Error> {
        let email = parse_email(email)?;
        self.redeem(&email, code).await?;
        if let Some(user) = self.users.find_by_email(&email).await? {
            return Ok(user);
        }

        let user = User::from_email(email, self.clock.utc());
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    async fn request_sign_in_code(&self, email: &str) -> Result<(), Error> {
        let email = parse_email(email)?;
        if self.users.find_by_email(&email).await?.is_none() {
            return Err(Error::not_found("No account exists for this email"));
        }
        self.issue_code(&email).await
    }

    async fn sign_in(&self, email: &str, code: &str) -> Result<User, Error> {
        let email = parse_email(email)?;
        self.redeem(&email, code).await?;
        self.users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| Error::not_found("No account exists for this email"))
    }
}

#[cfg(test)]
#[path = "email_auth_service_tests.rs"]
mod tests;
