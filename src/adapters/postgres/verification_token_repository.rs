//! PostgreSQL implementation of VerificationTokenRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entitlement::VerificationToken;
use crate::domain::foundation::{DomainError, OpaqueToken, Timestamp};
use crate::ports::VerificationTokenRepository;

use super::{database_error, is_unique_violation};

pub struct PostgresVerificationTokenRepository {
    pool: PgPool,
}

impl PostgresVerificationTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    email: String,
    token: String,
    expires_at: DateTime<Utc>,
}

impl From<TokenRow> for VerificationToken {
    fn from(row: TokenRow) -> Self {
        VerificationToken {
            email: row.email,
            token: OpaqueToken::from_string(row.token),
            expires_at: Timestamp::from_datetime(row.expires_at),
        }
    }
}

#[async_trait]
impl VerificationTokenRepository for PostgresVerificationTokenRepository {
    async fn save(&self, token: &VerificationToken) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO verification_tokens (email, token, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(&token.email)
        .bind(token.token.as_str())
        .bind(token.expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "verification_tokens_email_token_key") {
                return DomainError::validation("token", "Token already issued");
            }
            database_error("save verification token", e)
        })?;
        Ok(())
    }

    async fn consume(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let row: Option<TokenRow> = sqlx::query_as(
            r#"
            DELETE FROM verification_tokens
            WHERE email = $1 AND token = $2
            RETURNING email, token, expires_at
            "#,
        )
        .bind(email)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("consume verification token", e))?;

        Ok(row.map(VerificationToken::from))
    }
}
