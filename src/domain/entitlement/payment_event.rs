//! Typed payment events decoded from a verified webhook body.
//!
//! The provider sends a loosely shaped JSON object. It is decoded once,
//! right after signature verification, into a closed set of variants; event
//! types this system does not act on become [`PaymentEvent::Other`] instead
//! of failing.

use serde::Deserialize;

use super::webhook_errors::WebhookError;

/// Customer details attached to a payment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCustomer {
    pub email: String,
    pub full_name: Option<String>,
    pub subscription_id: Option<String>,
}

/// A payment provider notification this system understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// Payment succeeded; the subscription is active.
    Paid(PaymentCustomer),
    /// Payment was refunded; the subscription ends.
    Refunded(PaymentCustomer),
    /// Subscription was canceled.
    Canceled(PaymentCustomer),
    /// Any other event type. Acknowledged without state change.
    Other { event_type: String },
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    order_status: Option<String>,
    subscription_id: Option<String>,
    #[serde(rename = "Subscription")]
    subscription: Option<RawSubscription>,
    #[serde(rename = "Customer")]
    customer: Option<RawCustomer>,
}

#[derive(Debug, Deserialize)]
struct RawSubscription {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCustomer {
    email: Option<String>,
    full_name: Option<String>,
}

impl PaymentEvent {
    /// Decodes a trusted payload.
    ///
    /// # Errors
    ///
    /// - `ParseError` - body is not a JSON object of the expected shape
    /// - `MissingField` - a handled event lacks its customer email
    pub fn parse(payload: &[u8]) -> Result<Self, WebhookError> {
        let raw: RawPayload =
            serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let event_type = raw
            .order_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingField("order_status"))?
            .to_ascii_lowercase();

        let build: fn(PaymentCustomer) -> PaymentEvent = match event_type.as_str() {
            "paid" => PaymentEvent::Paid,
            "refunded" => PaymentEvent::Refunded,
            "canceled" => PaymentEvent::Canceled,
            _ => return Ok(PaymentEvent::Other { event_type }),
        };

        let customer = raw.customer.ok_or(WebhookError::MissingField("Customer"))?;
        let email = customer
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(WebhookError::MissingField("Customer.email"))?;
        let full_name = customer.full_name.filter(|n| !n.trim().is_empty());
        let subscription_id = raw
            .subscription_id
            .or_else(|| raw.subscription.and_then(|s| s.id))
            .filter(|id| !id.trim().is_empty());

        Ok(build(PaymentCustomer {
            email,
            full_name,
            subscription_id,
        }))
    }

    /// Event type label, for logs.
    pub fn event_type(&self) -> &str {
        match self {
            PaymentEvent::Paid(_) => "paid",
            PaymentEvent::Refunded(_) => "refunded",
            PaymentEvent::Canceled(_) => "canceled",
            PaymentEvent::Other { event_type } => event_type,
        }
    }
}
