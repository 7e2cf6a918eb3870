//! Individual content purchases.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::{ContentId, PurchaseId, Timestamp, UserId, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Failed,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
        }
    }
}

impl FromStr for PurchaseStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(PurchaseStatus::Pending),
            "completed" => Ok(PurchaseStatus::Completed),
            "failed" => Ok(PurchaseStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "purchase_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

/// One user's purchase of one piece of content.
///
/// Unique per (user_id, content_id); the store enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub content_id: ContentId,
    pub amount: Decimal,
    pub currency: String,
    pub status: PurchaseStatus,
    pub created_at: Timestamp,
}

impl Purchase {
    /// A purchase recorded at sale confirmation.
    pub fn completed(
        user_id: UserId,
        content_id: ContentId,
        amount: Decimal,
        currency: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let currency = currency.into().trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO code",
            ));
        }
        if amount.is_sign_negative() {
            return Err(ValidationError::invalid_format("amount", "must not be negative"));
        }
        Ok(Self {
            id: PurchaseId::new(),
            user_id,
            content_id,
            amount,
            currency,
            status: PurchaseStatus::Completed,
            created_at: Timestamp::now(),
        })
    }

    /// Only completed purchases grant access.
    pub fn is_completed(&self) -> bool {
        self.status == PurchaseStatus::Completed
    }
}
