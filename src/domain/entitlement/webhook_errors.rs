//! Errors raised while handling payment webhooks.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signing secret configured; every delivery is refused.
    #[error("Webhook secret not configured")]
    MissingSecret,

    /// Neither the header nor the query parameter carried a signature.
    #[error("Missing signature")]
    MissingSignature,

    /// Signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Trusted payload could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required field missing from the payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Entitlement store operation failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebhookError {
    /// Authentication failures are the only rejected deliveries.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingSecret
                | WebhookError::MissingSignature
                | WebhookError::InvalidSignature
        )
    }

    /// Wire status for this error.
    ///
    /// Everything past authentication is acknowledged so the provider stops
    /// retrying; the fault is logged instead.
    pub fn status_code(&self) -> StatusCode {
        if self.is_authentication_failure() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::OK
        }
    }
}
