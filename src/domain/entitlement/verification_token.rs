//! Email verification tokens issued at registration.

use crate::domain::foundation::{OpaqueToken, Timestamp};

/// Hours a verification token stays valid.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Single-use proof of email ownership, unique on (email, token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub email: String,
    pub token: OpaqueToken,
    pub expires_at: Timestamp,
}

impl VerificationToken {
    /// Issues a fresh token for `email`, valid for 24 hours from `now`.
    pub fn issue(email: impl Into<String>, now: Timestamp) -> Self {
        Self {
            email: email.into(),
            token: OpaqueToken::generate(),
            expires_at: now.plus_hours(VERIFICATION_TOKEN_TTL_HOURS),
        }
    }

    pub fn is_expired(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_expires_after_a_day() {
        let now = Timestamp::now();
        let token = VerificationToken::issue("a@b.com", now);

        assert!(!token.is_expired(&now.plus_hours(23)));
        assert!(token.is_expired(&now.plus_hours(24)));
        assert!(token.is_expired(&now.plus_hours(48)));
    }

    #[test]
    fn issued_tokens_are_unique() {
        let now = Timestamp::now();
        let a = VerificationToken::issue("a@b.com", now);
        let b = VerificationToken::issue("a@b.com", now);
        assert_ne!(a.token, b.token);
    }
}
