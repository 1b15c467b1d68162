//! Mail delivery adapters.
//!
//! Only a log-backed mailer ships today: codes are written to the structured
//! log so local and test environments can complete email sign-in.

use async_trait::async_trait;
use tracing::info;

use crate::domain::EmailAddress;
use crate::domain::ports::{Mailer, MailerError};

/// Mailer that records each verification code as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send_verification_code(
        &self,
        recipient: &EmailAddress,
        code: &str,
    ) -> Result<(), MailerError> {
        info!(
            recipient = %recipient,
            code,
            "verification code issued; delivering via log"
        );
        Ok(())
    }
}
