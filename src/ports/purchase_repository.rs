//! Purchase repository port.

use async_trait::async_trait;

use crate::domain::entitlement::Purchase;
use crate::domain::foundation::{ContentId, DomainError, UserId};

/// Repository port for individual purchases.
///
/// The (user_id, content_id) pair is unique. Implementations must enforce
/// this in storage so a racing duplicate fails, whatever callers checked
/// beforehand.
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Find the purchase for (user, content), in any status.
    async fn find(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
    ) -> Result<Option<Purchase>, DomainError>;

    /// Find the purchase for (user, content) only if it is completed.
    async fn find_completed(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
    ) -> Result<Option<Purchase>, DomainError> {
        Ok(self
            .find(user_id, content_id)
            .await?
            .filter(|purchase| purchase.is_completed()))
    }

    /// Store a completed purchase for the pair.
    ///
    /// Inserts a new row, or promotes an existing pending or failed row to
    /// completed with the new amount and currency. Returns the stored row,
    /// which keeps the original id when a row was promoted.
    ///
    /// # Errors
    ///
    /// - `PurchaseExists` if a completed purchase for the pair already exists
    /// - `DatabaseError` on persistence failure
    async fn record_completed(&self, purchase: &Purchase) -> Result<Purchase, DomainError>;
}
