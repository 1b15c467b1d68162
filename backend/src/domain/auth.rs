//! Authentication primitives: one-time codes and GitHub identities.
//!
//! Raw codes exist only in memory while being mailed or checked; storage sees
//! SHA-256 digests.

use chrono::{DateTime, Utc};
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Smallest six-digit verification code.
pub const VERIFICATION_CODE_MIN: u32 = 100_000;
/// Largest six-digit verification code.
pub const VERIFICATION_CODE_MAX: u32 = 999_999;

const EXCHANGE_CODE_BYTES: usize = 24;

/// What a stored one-time code unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePurpose {
    /// Six-digit code mailed for sign-up or sign-in.
    EmailVerification,
    /// Opaque code handed to the frontend after a GitHub callback.
    GitHubExchange,
}

impl CodePurpose {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmailVerification => "email_verification",
            Self::GitHubExchange => "github_exchange",
        }
    }

    /// Inverse of [`CodePurpose::as_str`].
    #[must_use]
    pub fn from_storage(value: &str) -> Option<Self> {
        [Self::EmailVerification, Self::GitHubExchange]
            .into_iter()
            .find(|purpose| purpose.as_str() == value)
    }
}

/// Validation failure for a submitted verification code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("verification code must be six digits")]
pub struct InvalidVerificationCode;

/// Six-digit code as submitted by a user.
///
/// # Examples
/// ```
/// use taskboard::domain::VerificationCode;
///
/// assert!(VerificationCode::parse("123456").is_ok());
/// assert!(VerificationCode::parse("12345").is_err());
/// assert!(VerificationCode::parse("12a456").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode(Zeroizing<String>);

impl VerificationCode {
    /// Validate submitted text.
    pub fn parse(raw: &str) -> Result<Self, InvalidVerificationCode> {
        let trimmed = raw.trim();
        if trimmed.len() != 6 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidVerificationCode);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Draw a fresh code in `100000..=999999`.
    #[must_use]
    pub fn generate() -> Self {
        let value = rand::thread_rng().gen_range(VERIFICATION_CODE_MIN..=VERIFICATION_CODE_MAX);
        Self(Zeroizing::new(value.to_string()))
    }

    /// Digits of the code.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Random hex code for the GitHub exchange step.
#[must_use]
pub fn generate_exchange_code() -> Zeroizing<String> {
    let mut bytes = [0_u8; EXCHANGE_CODE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    Zeroizing::new(hex::encode(bytes))
}

/// Storage digest for a code, bound to its purpose and subject scope.
///
/// Email codes are scoped by address so a guess can only consume the code of
/// the address it was submitted for.
///
/// # Examples
/// ```
/// use taskboard::domain::{CodePurpose, code_digest};
///
/// let a = code_digest(CodePurpose::EmailVerification, "a@example.com", "123456");
/// let b = code_digest(CodePurpose::EmailVerification, "b@example.com", "123456");
/// assert_ne!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
#[must_use]
pub fn code_digest(purpose: CodePurpose, scope: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(purpose.as_str().as_bytes());
    hasher.update([0_u8]);
    hasher.update(scope.as_bytes());
    hasher.update([0_u8]);
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Stored single-use code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    pub purpose: CodePurpose,
    /// Email address or user id the code was issued for.
    pub subject: String,
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Whether the code may still be redeemed at `now`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Account details returned by GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubProfile {
    /// Numeric account id rendered as text.
    pub id: String,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl GitHubProfile {
    /// Email to register, falling back to a synthetic address for accounts
    /// that hide theirs.
    #[must_use]
    pub fn email_or_placeholder(&self) -> String {
        self.email
            .clone()
            .filter(|email| !email.trim().is_empty())
            .unwrap_or_else(|| format!("{}@github.local", self.login))
    }

    /// Display name, falling back to the login.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.login.clone())
    }

    /// Link record for an existing account.
    #[must_use]
    pub fn link(&self) -> GitHubLink {
        GitHubLink {
            github_id: self.id.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// GitHub identity attached to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubLink {
    pub github_id: String,
    pub avatar_url: Option<String>,
}
