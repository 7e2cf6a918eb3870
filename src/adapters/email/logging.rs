//! Email sender that only logs, for local runs without a provider key.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{EmailSender, OutgoingEmail};

#[derive(Debug, Default, Clone)]
pub struct LoggingEmailSender;

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "email delivery disabled; message not sent"
        );
        Ok(())
    }
}
