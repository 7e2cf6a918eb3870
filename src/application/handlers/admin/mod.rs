//! Administrative handlers.
//!
//! ## Commands
//! - Set a user's subscription status

mod update_subscription_status;

pub use update_subscription_status::{
    UpdateSubscriptionStatusCommand, UpdateSubscriptionStatusHandler,
    UpdateSubscriptionStatusResult,
};

use crate::domain::entitlement::User;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserRepository;

/// Loads the acting user and checks the ADMIN role against the store.
///
/// The role is read fresh on every call, so a demoted admin loses access
/// immediately.
pub async fn ensure_admin(users: &dyn UserRepository, actor: &UserId) -> Result<User, DomainError> {
    match users.find_by_id(actor).await? {
        Some(user) if user.is_admin() => Ok(user),
        _ => Err(DomainError::new(ErrorCode::Forbidden, "Administrator role required")),
    }
}
