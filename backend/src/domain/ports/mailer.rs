//! Port for outbound email.

use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering email.
    pub enum MailerError {
        /// The message could not be handed to the delivery channel.
        Delivery { message: String } => "email delivery failed: {message}",
    }
}

/// Delivery channel for verification codes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a six-digit verification code to `recipient`.
    async fn send_verification_code(
        &self,
        recipient: &EmailAddress,
        code: &str,
    ) -> Result<(), MailerError>;
}
