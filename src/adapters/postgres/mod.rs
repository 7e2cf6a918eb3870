//! PostgreSQL adapters - Database implementations for the entitlement store ports.
//!
//! - `PostgresUserRepository` - Accounts and subscription status
//! - `PostgresContentReader` - Courses, vlogs and lessons
//! - `PostgresPurchaseRepository` - Purchases, unique per (user, content)
//! - `PostgresVerificationTokenRepository` - Email verification tokens
//!
//! Uniqueness is enforced by named constraints in `migrations/`; violations
//! map to domain error codes here.

mod content_reader;
mod purchase_repository;
mod user_repository;
mod verification_token_repository;

pub use content_reader::PostgresContentReader;
pub use purchase_repository::PostgresPurchaseRepository;
pub use user_repository::PostgresUserRepository;
pub use verification_token_repository::PostgresVerificationTokenRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// True if `error` is a unique violation of the named constraint.
fn is_unique_violation(error: &sqlx::Error, constraint: &str) -> bool {
    match error {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

fn database_error(action: &str, error: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, error),
    )
}
