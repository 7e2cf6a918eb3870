//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - sqlx store implementations
//! - `memory` - In-memory store for tests and local runs
//! - `auth` - Session tokens
//! - `security` - Password hashing
//! - `email` - Outbound email
//! - `http` - axum routes

pub mod auth;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod security;
