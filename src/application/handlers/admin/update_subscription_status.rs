//! UpdateSubscriptionStatusHandler - administrative subscription edit.

use std::sync::Arc;

use crate::domain::entitlement::SubscriptionStatus;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::UserRepository;

use super::ensure_admin;

/// Command to set one user's subscription status.
#[derive(Debug, Clone)]
pub struct UpdateSubscriptionStatusCommand {
    /// Administrator performing the change.
    pub actor: UserId,
    pub user_id: UserId,
    pub status: SubscriptionStatus,
}

#[derive(Debug, Clone)]
pub struct UpdateSubscriptionStatusResult {
    pub user_id: UserId,
    pub status: SubscriptionStatus,
}

/// Handler for the administrative edit path of the user lifecycle.
pub struct UpdateSubscriptionStatusHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateSubscriptionStatusHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSubscriptionStatusCommand,
    ) -> Result<UpdateSubscriptionStatusResult, DomainError> {
        ensure_admin(self.users.as_ref(), &cmd.actor).await?;

        self.users
            .set_subscription_status(&cmd.user_id, cmd.status)
            .await?;

        tracing::info!(
            actor = %cmd.actor,
            user_id = %cmd.user_id,
            status = %cmd.status,
            "Subscription status set by administrator"
        );
        Ok(UpdateSubscriptionStatusResult {
            user_id: cmd.user_id,
            status: cmd.status,
        })
    }
}
