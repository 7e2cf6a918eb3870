//! Webhook handlers.
//!
//! ## Commands
//! - Process a signed payment provider delivery

mod process_payment_webhook;

pub use process_payment_webhook::{
    AppliedTransition, ProcessPaymentWebhookCommand, ProcessPaymentWebhookHandler,
    WebhookOutcome,
};
