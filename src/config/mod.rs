//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `COURSE_CLUB` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use course_club::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod access;
mod auth;
mod database;
mod email;
mod error;
mod payment;
mod server;

pub use access::AccessConfig;
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub access: AccessConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `COURSE_CLUB` prefix
    /// 3. Splits nested keys on `__`
    ///
    /// - `COURSE_CLUB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COURSE_CLUB__PAYMENT__WEBHOOK_SECRET=...` -> `payment.webhook_secret`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COURSE_CLUB")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.email.validate(&self.server.environment)?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::FreeContentPolicy;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "COURSE_CLUB__DATABASE__URL",
        "COURSE_CLUB__AUTH__SESSION_SECRET",
        "COURSE_CLUB__SERVER__PORT",
        "COURSE_CLUB__SERVER__ENVIRONMENT",
        "COURSE_CLUB__PAYMENT__WEBHOOK_SECRET",
        "COURSE_CLUB__ACCESS__FREE_CONTENT_POLICY",
    ];

    fn set_minimal_env() {
        env::set_var("COURSE_CLUB__DATABASE__URL", "postgresql://test@localhost/club");
        env::set_var(
            "COURSE_CLUB__AUTH__SESSION_SECRET",
            "0123456789abcdef0123456789abcdef",
        );
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Loading
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn loads_minimal_environment_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/club");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.payment.signature_header, "x-webhook-signature");
        assert!(config.payment.webhook_secret.is_none());
        assert_eq!(config.access.free_content_policy, FreeContentPolicy::RequireLogin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_overrides_are_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("COURSE_CLUB__SERVER__PORT", "3000");
        env::set_var("COURSE_CLUB__PAYMENT__WEBHOOK_SECRET", "whsec_abc");
        env::set_var("COURSE_CLUB__ACCESS__FREE_CONTENT_POLICY", "public");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.payment.has_webhook_secret());
        assert_eq!(config.access.free_content_policy, FreeContentPolicy::Public);
    }

    #[test]
    fn production_requires_https_links() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("COURSE_CLUB__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::PublicBaseUrlMustBeHttps)
        );
    }

    #[test]
    fn missing_session_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("COURSE_CLUB__DATABASE__URL", "postgresql://test@localhost/club");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
