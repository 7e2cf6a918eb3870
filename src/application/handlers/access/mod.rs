//! Access handlers.
//!
//! ## Queries
//! - Resolve access for a (caller, content) pair
//! - Flat access check for API callers
//!
//! ## Guards
//! - Course, vlog and lesson page guards

mod check_content_access;
mod guard;
mod resolve_access;

pub use check_content_access::{
    CheckContentAccessHandler, CheckContentAccessQuery, ContentAccessView,
};
pub use guard::{AccessGuard, Grant, GuardOutcome, UnlockedBy};
pub use resolve_access::{ResolveAccessHandler, ResolveAccessQuery};
