//! Entitlement domain: who may see which content, and the payment events
//! that change it.

mod access;
mod content;
mod payment_event;
mod purchase;
mod user;
mod verification_token;
mod webhook_errors;
mod webhook_verifier;

pub use access::{
    evaluate_entitlement, free_access, AccessDecision, AccessReason, FreeContentPolicy,
};
pub use content::{Content, ContentSummary, ContentType, Lesson};
pub use payment_event::{PaymentCustomer, PaymentEvent};
pub use purchase::{Purchase, PurchaseStatus};
pub use user::{Role, SubscriptionStatus, User};
pub use verification_token::{VerificationToken, VERIFICATION_TOKEN_TTL_HOURS};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::WebhookVerifier;
