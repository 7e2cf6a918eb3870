//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::access::{
    AccessGuard, CheckContentAccessHandler, CheckContentAccessQuery, ContentAccessView, Grant,
    GuardOutcome, ResolveAccessHandler, ResolveAccessQuery, UnlockedBy,
};
pub use handlers::webhook::{
    AppliedTransition, ProcessPaymentWebhookCommand, ProcessPaymentWebhookHandler, WebhookOutcome,
};
