//! ProcessPaymentWebhookHandler - applies payment events to subscription state.

use axum::http::StatusCode;
use std::sync::Arc;

use crate::domain::entitlement::{
    PaymentCustomer, PaymentEvent, SubscriptionStatus, User, WebhookError, WebhookVerifier,
};
use crate::domain::foundation::{DomainError, ErrorCode, OpaqueToken, UserId};
use crate::ports::{PasswordHasher, UserRepository};

/// Command carrying one webhook delivery, untouched.
#[derive(Debug, Clone)]
pub struct ProcessPaymentWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature from the header, or the query parameter fallback.
    pub signature: Option<String>,
}

/// State change made by an accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedTransition {
    /// Existing account(s) set to ACTIVE.
    Activated { email: String, updated: u64 },
    /// New account created as ACTIVE.
    Provisioned { email: String, user_id: UserId },
    /// Matching account(s) set to INACTIVE. `updated` may be zero.
    Deactivated { email: String, updated: u64 },
}

/// Result of processing one delivery.
#[derive(Debug)]
pub enum WebhookOutcome {
    /// Authentication failed. The payload was never interpreted.
    Rejected(WebhookError),
    /// Accepted and applied.
    Applied(AppliedTransition),
    /// Accepted; event type needs no state change.
    Ignored { event_type: String },
    /// Accepted, but processing failed. Logged, not surfaced to the sender.
    FailedLogged(WebhookError),
}

impl WebhookOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, WebhookOutcome::Rejected(_))
    }

    /// Wire status: 401 for rejections, 200 for everything else.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookOutcome::Rejected(error) => error.status_code(),
            _ => StatusCode::OK,
        }
    }
}

/// Handler for payment provider webhooks.
///
/// Each event is an absolute state-set, so redelivery and reordering
/// converge on the same end state. Provisioning is the one branch that
/// creates rows; a second `paid` for the same email finds the account and
/// takes the update branch.
pub struct ProcessPaymentWebhookHandler {
    verifier: Option<WebhookVerifier>,
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl ProcessPaymentWebhookHandler {
    /// `verifier` is `None` when no secret is configured; every delivery is
    /// then rejected.
    pub fn new(
        verifier: Option<WebhookVerifier>,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            verifier,
            users,
            hasher,
        }
    }

    pub async fn handle(&self, cmd: ProcessPaymentWebhookCommand) -> WebhookOutcome {
        // 1. Authenticity, before anything reads the body
        let verifier = match &self.verifier {
            Some(verifier) => verifier,
            None => {
                tracing::warn!("Payment webhook rejected: no webhook secret configured");
                return WebhookOutcome::Rejected(WebhookError::MissingSecret);
            }
        };
        if let Err(error) = verifier.verify(&cmd.payload, cmd.signature.as_deref()) {
            tracing::warn!(error = %error, "Payment webhook rejected");
            return WebhookOutcome::Rejected(error);
        }

        // 2. Decode the trusted payload
        let event = match PaymentEvent::parse(&cmd.payload) {
            Ok(event) => event,
            Err(error) => {
                tracing::error!(error = %error, "Verified payment webhook could not be decoded");
                return WebhookOutcome::FailedLogged(error);
            }
        };

        // 3. Apply
        let event_type = event.event_type().to_string();
        match self.apply(event).await {
            Ok(outcome) => {
                if let WebhookOutcome::Applied(transition) = &outcome {
                    tracing::info!(
                        event_type = %event_type,
                        transition = ?transition,
                        "Payment webhook applied"
                    );
                }
                outcome
            }
            Err(error) => {
                tracing::error!(
                    event_type = %event_type,
                    error = %error,
                    "Payment webhook processing failed"
                );
                WebhookOutcome::FailedLogged(error)
            }
        }
    }

    async fn apply(&self, event: PaymentEvent) -> Result<WebhookOutcome, WebhookError> {
        let transition = match event {
            PaymentEvent::Paid(customer) => self.activate(customer).await?,
            PaymentEvent::Refunded(customer) | PaymentEvent::Canceled(customer) => {
                self.deactivate(customer).await?
            }
            PaymentEvent::Other { event_type } => {
                tracing::debug!(event_type = %event_type, "Payment webhook ignored");
                return Ok(WebhookOutcome::Ignored { event_type });
            }
        };
        Ok(WebhookOutcome::Applied(transition))
    }

    async fn activate(
        &self,
        customer: PaymentCustomer,
    ) -> Result<AppliedTransition, WebhookError> {
        let updated = self.set_active(&customer).await?;
        if updated > 0 {
            return Ok(AppliedTransition::Activated {
                email: customer.email,
                updated,
            });
        }

        // Unknown email: provision an account with an unusable random password.
        let password = OpaqueToken::generate();
        let password_hash = self.hasher.hash(password.as_str()).map_err(storage)?;
        let user = User::provision_from_payment(
            customer.email.clone(),
            customer.full_name.clone(),
            password_hash,
            customer.subscription_id.clone(),
        );

        match self.users.create(&user).await {
            Ok(()) => Ok(AppliedTransition::Provisioned {
                email: customer.email,
                user_id: user.id,
            }),
            // A concurrent delivery created the account first.
            Err(error) if error.code == ErrorCode::UserExists => {
                let updated = self.set_active(&customer).await?;
                Ok(AppliedTransition::Activated {
                    email: customer.email,
                    updated,
                })
            }
            Err(error) => Err(storage(error)),
        }
    }

    async fn set_active(&self, customer: &PaymentCustomer) -> Result<u64, WebhookError> {
        self.users
            .set_subscription_status_by_email(
                &customer.email,
                SubscriptionStatus::Active,
                customer.full_name.as_deref(),
                customer.subscription_id.as_deref(),
            )
            .await
            .map_err(storage)
    }

    async fn deactivate(
        &self,
        customer: PaymentCustomer,
    ) -> Result<AppliedTransition, WebhookError> {
        let updated = self
            .users
            .set_subscription_status_by_email(
                &customer.email,
                SubscriptionStatus::Inactive,
                None,
                None,
            )
            .await
            .map_err(storage)?;

        if updated == 0 {
            tracing::warn!("Deactivation event matched no user");
        }
        Ok(AppliedTransition::Deactivated {
            email: customer.email,
            updated,
        })
    }
}

fn storage(error: DomainError) -> WebhookError {
    WebhookError::Storage(error.to_string())
}
