//! In-memory adapters.
//!
//! A single store backing every entitlement port, with the same uniqueness
//! rules as the PostgreSQL schema. Used by tests and local runs without a
//! database.

mod entitlement_store;

pub use entitlement_store::InMemoryEntitlementStore;
