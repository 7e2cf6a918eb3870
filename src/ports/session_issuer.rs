//! Session issuing port, the counterpart of [`SessionValidator`].
//!
//! [`SessionValidator`]: super::SessionValidator

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// A signed session token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_in_secs: i64,
}

/// Issues session tokens after a successful login.
pub trait SessionIssuer: Send + Sync {
    fn issue(&self, user: &AuthenticatedUser) -> Result<IssuedSession, AuthError>;
}
