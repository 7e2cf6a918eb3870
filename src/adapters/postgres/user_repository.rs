//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entitlement::{Role, SubscriptionStatus, User};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::UserRepository;

use super::{database_error, is_unique_violation};

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: Option<String>,
    password_hash: String,
    role: String,
    subscription_status: String,
    subscription_id: Option<String>,
    email_verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id).map_err(corrupt)?,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            role: row.role.parse::<Role>().map_err(corrupt)?,
            subscription_status: row
                .subscription_status
                .parse::<SubscriptionStatus>()
                .map_err(corrupt)?,
            subscription_id: row.subscription_id,
            email_verified_at: row.email_verified_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn corrupt(e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid user row: {}", e))
}

const SELECT_USER: &str = r#"
    SELECT id, email, name, password_hash, role, subscription_status, subscription_id,
           email_verified_at, created_at, updated_at
    FROM users
"#;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("find user", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE email = $1 LIMIT 1", SELECT_USER))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("find user by email", e))?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, name, password_hash, role, subscription_status, subscription_id,
                email_verified_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.subscription_status.as_str())
        .bind(&user.subscription_id)
        .bind(user.email_verified_at.map(|t| *t.as_datetime()))
        .bind(user.created_at.as_datetime())
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "users_email_key") || is_unique_violation(&e, "users_pkey") {
                return DomainError::new(ErrorCode::UserExists, "Email already registered");
            }
            database_error("create user", e)
        })?;

        Ok(())
    }

    async fn set_subscription_status_by_email(
        &self,
        email: &str,
        status: SubscriptionStatus,
        name: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                subscription_status = $2,
                name = COALESCE($3, name),
                subscription_id = COALESCE($4, subscription_id),
                updated_at = NOW()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(status.as_str())
        .bind(name)
        .bind(subscription_id)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update subscription status", e))?;

        Ok(result.rows_affected())
    }

    async fn set_subscription_status(
        &self,
        id: &UserId,
        status: SubscriptionStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE users SET subscription_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_str())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update subscription status", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }
        Ok(())
    }

    async fn mark_email_verified(&self, email: &str, at: Timestamp) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET email_verified_at = $2, updated_at = $2 WHERE email = $1",
        )
        .bind(email)
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("mark email verified", e))?;

        Ok(result.rows_affected() > 0)
    }
}
