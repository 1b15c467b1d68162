//! User accounts and email addresses.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::UserId;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not match `local@domain.tld`.
    #[error("email address is not valid")]
    InvalidEmail,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid email address.
///
/// # Examples
/// ```
/// use taskboard::domain::EmailAddress;
///
/// let email = EmailAddress::new(" ada@example.com ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// assert_eq!(email.local_part(), "ada");
/// assert!(EmailAddress::new("ada@example").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Portion before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Numeric GitHub account id rendered as text, once linked.
    pub github_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New account whose display name defaults to the email local part.
    #[must_use]
    pub fn from_email(email: EmailAddress, now: DateTime<Utc>) -> Self {
        let display_name = email.local_part().to_owned();
        Self {
            id: UserId::random(),
            email,
            display_name,
            avatar_url: None,
            github_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_empty(#[case] raw: &str) {
        assert_eq!(EmailAddress::new(raw), Err(UserValidationError::EmptyEmail));
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("no-domain@")]
    #[case("two words@example.com")]
    #[case("ada@example")]
    fn rejects_malformed(#[case] raw: &str) {
        assert_eq!(EmailAddress::new(raw), Err(UserValidationError::InvalidEmail));
    }

    #[rstest]
    fn from_email_uses_local_part() {
        let email = EmailAddress::new("grace.hopper@navy.mil").expect("valid email");
        let user = User::from_email(email, Utc::now());
        assert_eq!(user.display_name, "grace.hopper");
        assert!(user.github_id.is_none());
    }
}
