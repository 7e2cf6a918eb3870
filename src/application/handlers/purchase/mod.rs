//! Purchase handlers.
//!
//! ## Commands
//! - Record a completed individual purchase

mod record_purchase;

pub use record_purchase::{RecordPurchaseCommand, RecordPurchaseHandler, RecordPurchaseResult};
