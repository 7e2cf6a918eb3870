//! Session configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Session token settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens
    pub session_secret: SecretString,

    /// Session lifetime in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Where page guards send anonymous callers
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Cookie carrying the session token for page routes
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.session_secret.expose_secret();
        if secret.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__SESSION_SECRET"));
        }
        if secret.len() < 32 {
            return Err(ValidationError::SessionSecretTooShort);
        }
        if !(1..=720).contains(&self.session_ttl_hours) {
            return Err(ValidationError::InvalidSessionTtl);
        }
        if !self.login_path.starts_with('/') {
            return Err(ValidationError::InvalidLoginPath);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: SecretString::new(String::new()),
            session_ttl_hours: default_session_ttl_hours(),
            login_path: default_login_path(),
            session_cookie: default_session_cookie(),
        }
    }
}

fn default_session_ttl_hours() -> i64 {
    24 * 7
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_session_cookie() -> String {
    "club_session".to_string()
}
