//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `entitlement` - Users, content, purchases, access rules and payment events

pub mod entitlement;
pub mod foundation;
