//! HTTP middleware.

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, OptionalAuth, RequireAuth, SessionFailure};
