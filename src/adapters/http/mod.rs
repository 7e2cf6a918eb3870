//! HTTP adapter - axum routes over the application handlers.
//!
//! - `access` - Access-check endpoint and guarded page routes
//! - `webhooks` - Payment provider webhook
//! - `account` - Registration, email verification, login
//! - `admin` - Purchases and subscription edits
//! - `middleware` - Session authentication

pub mod access;
pub mod account;
pub mod admin;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;
pub mod webhooks;

pub use error::{ApiError, ErrorResponse};
pub use router::app_router;
pub use state::{AppPorts, AppState, HttpSettings};
