//! VerifyEmailHandler - consumes a single-use verification token.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{UserRepository, VerificationTokenRepository};

/// Command to verify an email address.
#[derive(Debug, Clone)]
pub struct VerifyEmailCommand {
    pub email: String,
    pub token: String,
}

/// Result of a successful verification.
#[derive(Debug, Clone)]
pub struct VerifyEmailResult {
    pub email: String,
    pub verified_at: Timestamp,
}

/// Handler for email verification.
pub struct VerifyEmailHandler {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn VerificationTokenRepository>,
}

impl VerifyEmailHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn VerificationTokenRepository>,
    ) -> Self {
        Self { users, tokens }
    }

    pub async fn handle(
        &self,
        cmd: VerifyEmailCommand,
    ) -> Result<VerifyEmailResult, DomainError> {
        // Consumed before anything else, so a link works at most once even
        // under concurrent requests.
        let token = self
            .tokens
            .consume(&cmd.email, &cmd.token)
            .await?
            .ok_or_else(invalid_token)?;

        let now = Timestamp::now();
        if token.is_expired(&now) {
            return Err(invalid_token());
        }

        if !self.users.mark_email_verified(&cmd.email, now).await? {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(VerifyEmailResult {
            email: cmd.email,
            verified_at: now,
        })
    }
}

fn invalid_token() -> DomainError {
    DomainError::new(
        ErrorCode::InvalidVerificationToken,
        "Verification link is invalid or has expired",
    )
}
