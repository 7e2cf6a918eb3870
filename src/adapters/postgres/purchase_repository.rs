//! PostgreSQL implementation of PurchaseRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlement::{Purchase, PurchaseStatus};
use crate::domain::foundation::{ContentId, DomainError, ErrorCode, PurchaseId, Timestamp, UserId};
use crate::ports::PurchaseRepository;

use super::{database_error, is_unique_violation};

pub struct PostgresPurchaseRepository {
    pool: PgPool,
}

impl PostgresPurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    user_id: String,
    content_id: Uuid,
    amount: Decimal,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let corrupt = |e: String| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid purchase row: {}", e))
        };
        Ok(Purchase {
            id: PurchaseId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| corrupt(e.to_string()))?,
            content_id: ContentId::from_uuid(row.content_id),
            amount: row.amount,
            currency: row.currency,
            status: row
                .status
                .parse::<PurchaseStatus>()
                .map_err(|e| corrupt(e.to_string()))?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl PurchaseRepository for PostgresPurchaseRepository {
    async fn find(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
    ) -> Result<Option<Purchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, content_id, amount, currency, status, created_at
            FROM purchases
            WHERE user_id = $1 AND content_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(content_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find purchase", e))?;

        row.map(Purchase::try_from).transpose()
    }

    async fn record_completed(&self, purchase: &Purchase) -> Result<Purchase, DomainError> {
        // A completed row is never touched; the conflict update matches
        // nothing and no row comes back.
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            INSERT INTO purchases (id, user_id, content_id, amount, currency, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, content_id) DO UPDATE
            SET status = EXCLUDED.status,
                amount = EXCLUDED.amount,
                currency = EXCLUDED.currency
            WHERE purchases.status <> EXCLUDED.status
            RETURNING id, user_id, content_id, amount, currency, status, created_at
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(purchase.user_id.as_str())
        .bind(purchase.content_id.as_uuid())
        .bind(purchase.amount)
        .bind(&purchase.currency)
        .bind(PurchaseStatus::Completed.as_str())
        .bind(purchase.created_at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "purchases_user_id_content_id_key") {
                return already_completed();
            }
            database_error("record purchase", e)
        })?;

        match row {
            Some(row) => Purchase::try_from(row),
            None => Err(already_completed()),
        }
    }
}

fn already_completed() -> DomainError {
    DomainError::new(
        ErrorCode::PurchaseExists,
        "Purchase already exists for this user and content",
    )
}
