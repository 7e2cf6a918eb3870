//! Email configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Transactional email settings (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key. Without one, emails are logged instead of sent.
    pub resend_api_key: Option<SecretString>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Base URL used to build links in outgoing email
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl EmailConfig {
    /// Formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if let Some(key) = &self.resend_api_key {
            if !key.expose_secret().starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        let base = &self.public_base_url;
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ValidationError::InvalidPublicBaseUrl);
        }
        if *environment == Environment::Production && !base.starts_with("https://") {
            return Err(ValidationError::PublicBaseUrlMustBeHttps);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@courseclub.local".to_string()
}

fn default_from_name() -> String {
    "Course Club".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}
