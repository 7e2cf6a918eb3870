//! Shared state for the HTTP adapter.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::application::handlers::access::{
    AccessGuard, CheckContentAccessHandler, ResolveAccessHandler,
};
use crate::application::handlers::account::{LoginHandler, RegisterUserHandler, VerifyEmailHandler};
use crate::application::handlers::admin::UpdateSubscriptionStatusHandler;
use crate::application::handlers::purchase::RecordPurchaseHandler;
use crate::application::handlers::webhook::ProcessPaymentWebhookHandler;
use crate::config::AppConfig;
use crate::domain::entitlement::{FreeContentPolicy, WebhookVerifier};
use crate::ports::{
    ContentReader, EmailSender, PasswordHasher, PurchaseRepository, SessionIssuer,
    SessionValidator, UserRepository, VerificationTokenRepository,
};

/// Port implementations the HTTP layer is built from.
#[derive(Clone)]
pub struct AppPorts {
    pub users: Arc<dyn UserRepository>,
    pub contents: Arc<dyn ContentReader>,
    pub purchases: Arc<dyn PurchaseRepository>,
    pub verification_tokens: Arc<dyn VerificationTokenRepository>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub session_issuer: Arc<dyn SessionIssuer>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub email_sender: Arc<dyn EmailSender>,
}

/// Request-independent HTTP settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub login_path: String,
    pub session_cookie: String,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
    pub signature_header: String,
    pub signature_query_param: String,
    pub webhook_secret: Option<SecretString>,
    pub free_content_policy: FreeContentPolicy,
    pub public_base_url: String,
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
}

impl HttpSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            login_path: config.auth.login_path.clone(),
            session_cookie: config.auth.session_cookie.clone(),
            secure_cookies: config.is_production(),
            signature_header: config.payment.signature_header.clone(),
            signature_query_param: config.payment.signature_query_param.clone(),
            webhook_secret: config.payment.webhook_secret.clone(),
            free_content_policy: config.access.free_content_policy,
            public_base_url: config.email.public_base_url.clone(),
            request_timeout: config.server.request_timeout(),
            cors_origins: config.server.cors_origins_list(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            session_cookie: "club_session".to_string(),
            secure_cookies: false,
            signature_header: "x-webhook-signature".to_string(),
            signature_query_param: "signature".to_string(),
            webhook_secret: None,
            free_content_policy: FreeContentPolicy::default(),
            public_base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Handlers and settings shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<HttpSettings>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub resolver: Arc<ResolveAccessHandler>,
    pub check_access: Arc<CheckContentAccessHandler>,
    pub guard: Arc<AccessGuard>,
    pub webhook: Arc<ProcessPaymentWebhookHandler>,
    pub register: Arc<RegisterUserHandler>,
    pub verify_email: Arc<VerifyEmailHandler>,
    pub login: Arc<LoginHandler>,
    pub record_purchase: Arc<RecordPurchaseHandler>,
    pub update_subscription: Arc<UpdateSubscriptionStatusHandler>,
}

impl AppState {
    /// Wires every application handler from the given ports.
    pub fn new(ports: AppPorts, settings: HttpSettings) -> Self {
        let resolver = Arc::new(
            ResolveAccessHandler::new(
                ports.users.clone(),
                ports.contents.clone(),
                ports.purchases.clone(),
            )
            .with_policy(settings.free_content_policy),
        );
        let verifier = WebhookVerifier::from_config(settings.webhook_secret.as_ref());

        Self {
            session_validator: ports.session_validator.clone(),
            check_access: Arc::new(CheckContentAccessHandler::new(resolver.clone())),
            guard: Arc::new(AccessGuard::new(resolver.clone(), ports.contents.clone())),
            webhook: Arc::new(ProcessPaymentWebhookHandler::new(
                verifier,
                ports.users.clone(),
                ports.password_hasher.clone(),
            )),
            register: Arc::new(RegisterUserHandler::new(
                ports.users.clone(),
                ports.verification_tokens.clone(),
                ports.password_hasher.clone(),
                ports.email_sender.clone(),
                settings.public_base_url.clone(),
            )),
            verify_email: Arc::new(VerifyEmailHandler::new(
                ports.users.clone(),
                ports.verification_tokens.clone(),
            )),
            login: Arc::new(LoginHandler::new(
                ports.users.clone(),
                ports.password_hasher.clone(),
                ports.session_issuer.clone(),
            )),
            record_purchase: Arc::new(RecordPurchaseHandler::new(
                ports.users.clone(),
                ports.contents.clone(),
                ports.purchases.clone(),
            )),
            update_subscription: Arc::new(UpdateSubscriptionStatusHandler::new(ports.users)),
            resolver,
            settings: Arc::new(settings),
        }
    }
}
