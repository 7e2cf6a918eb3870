//! RegisterUserHandler - self-service account creation.

use std::sync::Arc;

use crate::domain::entitlement::{User, VerificationToken};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId, ValidationError};
use crate::ports::{
    EmailSender, OutgoingEmail, PasswordHasher, UserRepository, VerificationTokenRepository,
};

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl RegisterUserCommand {
    fn validate(&self) -> Result<(), ValidationError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(ValidationError::invalid_format("email", "must be an email address")),
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::too_short("password", MIN_PASSWORD_LEN));
        }
        Ok(())
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterUserResult {
    pub user_id: UserId,
    pub email: String,
}

/// Handler for registration.
///
/// The account starts INACTIVE and unverified. A verification token is
/// stored and emailed; email delivery runs detached and its failure never
/// fails the registration.
pub struct RegisterUserHandler {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn VerificationTokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    email_sender: Arc<dyn EmailSender>,
    public_base_url: String,
}

impl RegisterUserHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn VerificationTokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
        email_sender: Arc<dyn EmailSender>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            email_sender,
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: RegisterUserCommand,
    ) -> Result<RegisterUserResult, DomainError> {
        cmd.validate()?;
        let email = cmd.email.trim().to_string();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::new(ErrorCode::UserExists, "Email already registered"));
        }

        let password_hash = self.hasher.hash(&cmd.password)?;
        let name = cmd
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let user = User::register(email.clone(), name, password_hash);

        // Token first, so a failed save leaves no account behind.
        let token = VerificationToken::issue(email.clone(), Timestamp::now());
        self.tokens.save(&token).await?;
        // The store rejects a racing duplicate with UserExists. Its token is
        // never sent and expires unused.
        self.users.create(&user).await?;

        let message = self.verification_email(&token)?;
        let sender = Arc::clone(&self.email_sender);
        tokio::spawn(async move {
            if let Err(error) = sender.send(message).await {
                tracing::warn!(error = %error, "Verification email not sent");
            }
        });

        tracing::info!(user_id = %user.id, "User registered");
        Ok(RegisterUserResult {
            user_id: user.id,
            email,
        })
    }

    fn verification_email(
        &self,
        token: &VerificationToken,
    ) -> Result<OutgoingEmail, DomainError> {
        let endpoint = format!(
            "{}/api/auth/verify-email",
            self.public_base_url.trim_end_matches('/')
        );
        let link = reqwest::Url::parse_with_params(
            &endpoint,
            &[("email", token.email.as_str()), ("token", token.token.as_str())],
        )
        .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        Ok(OutgoingEmail {
            to: token.email.clone(),
            subject: "Confirm your email".to_string(),
            html: format!(
                "<p>Welcome! Confirm your email address to finish signing up.</p>\
                 <p><a href=\"{link}\">Confirm email</a></p>\
                 <p>This link expires in 24 hours.</p>"
            ),
        })
    }
}
