//! Payment webhook configuration

use secrecy::SecretString;
use serde::Deserialize;

/// Settings for the payment provider's webhook deliveries.
///
/// An absent secret is valid configuration: the webhook processor then
/// rejects every delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Shared HMAC secret for webhook signatures
    pub webhook_secret: Option<SecretString>,

    /// Header carrying the hex signature
    #[serde(default = "default_signature_header")]
    pub signature_header: String,

    /// Query parameter consulted when the header is absent
    #[serde(default = "default_signature_query_param")]
    pub signature_query_param: String,
}

impl PaymentConfig {
    pub fn has_webhook_secret(&self) -> bool {
        use secrecy::ExposeSecret;
        self.webhook_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().trim().is_empty())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            signature_header: default_signature_header(),
            signature_query_param: default_signature_query_param(),
        }
    }
}

fn default_signature_header() -> String {
    "x-webhook-signature".to_string()
}

fn default_signature_query_param() -> String {
    "signature".to_string()
}
