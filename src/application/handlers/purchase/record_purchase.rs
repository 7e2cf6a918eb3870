//! RecordPurchaseHandler - records a confirmed individual sale.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::application::handlers::admin::ensure_admin;
use crate::domain::entitlement::Purchase;
use crate::domain::foundation::{ContentId, DomainError, ErrorCode, UserId};
use crate::ports::{ContentReader, PurchaseRepository, UserRepository};

/// Command to record a completed purchase.
#[derive(Debug, Clone)]
pub struct RecordPurchaseCommand {
    /// Administrator recording the sale.
    pub actor: UserId,
    pub user_id: UserId,
    pub content_id: ContentId,
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct RecordPurchaseResult {
    pub purchase: Purchase,
}

/// Handler for recording purchases.
///
/// Only a completed purchase blocks the sale. A pending or failed row for
/// the same pair is promoted to completed. The "already purchased" lookup
/// is an early exit only; the store rejects a racing duplicate.
pub struct RecordPurchaseHandler {
    users: Arc<dyn UserRepository>,
    contents: Arc<dyn ContentReader>,
    purchases: Arc<dyn PurchaseRepository>,
}

impl RecordPurchaseHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        contents: Arc<dyn ContentReader>,
        purchases: Arc<dyn PurchaseRepository>,
    ) -> Self {
        Self {
            users,
            contents,
            purchases,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordPurchaseCommand,
    ) -> Result<RecordPurchaseResult, DomainError> {
        ensure_admin(self.users.as_ref(), &cmd.actor).await?;

        if self.users.find_by_id(&cmd.user_id).await?.is_none() {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }
        if self.contents.find_content(&cmd.content_id).await?.is_none() {
            return Err(DomainError::new(ErrorCode::ContentNotFound, "Content not found"));
        }

        if self
            .purchases
            .find_completed(&cmd.user_id, &cmd.content_id)
            .await?
            .is_some()
        {
            return Err(already_purchased());
        }

        let sale = Purchase::completed(cmd.user_id, cmd.content_id, cmd.amount, cmd.currency)?;
        let purchase = self.purchases.record_completed(&sale).await?;

        tracing::info!(
            purchase_id = %purchase.id,
            user_id = %purchase.user_id,
            content_id = %purchase.content_id,
            "Purchase recorded"
        );
        Ok(RecordPurchaseResult { purchase })
    }
}

fn already_purchased() -> DomainError {
    DomainError::new(
        ErrorCode::PurchaseExists,
        "User already purchased this content",
    )
}
