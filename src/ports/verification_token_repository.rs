//! Verification token repository port.

use async_trait::async_trait;

use crate::domain::entitlement::VerificationToken;
use crate::domain::foundation::DomainError;

/// Storage for single-use email verification tokens, unique on (email, token).
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    async fn save(&self, token: &VerificationToken) -> Result<(), DomainError>;

    /// Remove the token matching both email and value and return it.
    ///
    /// Removal and lookup are one step: of two concurrent calls for the same
    /// token, at most one gets `Some`. Expired tokens are removed too; the
    /// caller checks expiry on the returned value.
    async fn consume(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<VerificationToken>, DomainError>;
}
