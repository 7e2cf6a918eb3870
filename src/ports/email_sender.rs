//! Outbound email port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivers transactional email. Callers treat delivery as best effort.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError>;
}
