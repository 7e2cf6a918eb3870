//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod access;
pub mod account;
pub mod admin;
pub mod purchase;
pub mod webhook;
