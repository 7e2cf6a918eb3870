//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the entitlement domain.

mod auth;
mod errors;
mod ids;
mod timestamp;
mod token;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ContentId, LessonId, PurchaseId, UserId};
pub use timestamp::Timestamp;
pub use token::OpaqueToken;
