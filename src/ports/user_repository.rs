//! User repository port.
//!
//! Reads and absolute writes against the user table of the entitlement
//! store. No business rules live behind this trait; callers decide which
//! status to write.

use async_trait::async_trait;

use crate::domain::entitlement::{SubscriptionStatus, User};
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Repository port for user accounts.
///
/// Implementations must enforce email uniqueness at the storage layer.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by exact email. Returns `None` if not found.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// - `UserExists` if the email is already taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Set subscription status for every user with `email`.
    ///
    /// `name` and `subscription_id`, when given, overwrite the stored values.
    /// Returns the number of rows changed; zero when no user matches.
    async fn set_subscription_status_by_email(
        &self,
        email: &str,
        status: SubscriptionStatus,
        name: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<u64, DomainError>;

    /// Set subscription status for one user.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no user has this id
    async fn set_subscription_status(
        &self,
        id: &UserId,
        status: SubscriptionStatus,
    ) -> Result<(), DomainError>;

    /// Record the time `email` was verified. Returns false if no user matches.
    async fn mark_email_verified(&self, email: &str, at: Timestamp) -> Result<bool, DomainError>;
}
