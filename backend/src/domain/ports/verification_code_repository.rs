//! Port for short-lived single-use codes.
//!
//! Codes are stored as digests only. A code is consumed at most once and is
//! never returned after its expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CodePurpose, OneTimeCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by verification code adapters.
    pub enum VerificationCodeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "code repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "code repository query failed: {message}",
    }
}

/// Storage for email verification and OAuth exchange codes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Store a code, replacing any outstanding code for the same purpose and
    /// subject.
    async fn store(&self, code: &OneTimeCode) -> Result<(), VerificationCodeRepositoryError>;

    /// Atomically remove and return the unexpired code matching `digest`.
    async fn consume(
        &self,
        purpose: CodePurpose,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, VerificationCodeRepositoryError>;
}
