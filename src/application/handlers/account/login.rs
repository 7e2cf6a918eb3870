//! LoginHandler - password login issuing a session token.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, UserId};
use crate::ports::{PasswordHasher, SessionIssuer, UserRepository};

/// Command to log in.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Session issued on successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user_id: UserId,
    pub token: String,
    pub expires_in_secs: i64,
}

/// Handler for password login.
///
/// Unknown email and wrong password produce the same error.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    sessions: Arc<dyn SessionIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            sessions,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, DomainError> {
        let user = self
            .users
            .find_by_email(cmd.email.trim())
            .await?
            .ok_or_else(invalid_credentials)?;

        if !self.hasher.verify(&cmd.password, &user.password_hash)? {
            return Err(invalid_credentials());
        }

        let session = self
            .sessions
            .issue(&AuthenticatedUser::new(user.id.clone(), user.email.clone()))
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResult {
            user_id: user.id,
            token: session.token,
            expires_in_secs: session.expires_in_secs,
        })
    }
}

fn invalid_credentials() -> DomainError {
    DomainError::new(ErrorCode::InvalidCredentials, "Invalid email or password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryEntitlementStore;
    use crate::domain::entitlement::User;
    use crate::domain::foundation::AuthError;
    use crate::ports::IssuedSession;

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, DomainError> {
            Ok(format!("plain${}", password))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
            Ok(hash == format!("plain${}", password))
        }
    }

    struct FixedIssuer;

    impl SessionIssuer for FixedIssuer {
        fn issue(&self, user: &AuthenticatedUser) -> Result<IssuedSession, AuthError> {
            Ok(IssuedSession {
                token: format!("session-for-{}", user.id),
                expires_in_secs: 3600,
            })
        }
    }

    async fn handler_with_user() -> (LoginHandler, User) {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let user = User::register("d@e.com", None, "plain$hunter22".to_string());
        store.create(&user).await.unwrap();
        (
            LoginHandler::new(store, Arc::new(PlainHasher), Arc::new(FixedIssuer)),
            user,
        )
    }

    #[tokio::test]
    async fn issues_session_for_valid_password() {
        let (handler, user) = handler_with_user().await;

        let result = handler
            .handle(LoginCommand {
                email: "d@e.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.user_id, user.id);
        assert_eq!(result.token, format!("session-for-{}", user.id));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let (handler, _) = handler_with_user().await;

        let err = handler
            .handle(LoginCommand {
                email: "d@e.com".to_string(),
                password: "hunter23".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let (handler, _) = handler_with_user().await;

        let err = handler
            .handle(LoginCommand {
                email: "nobody@e.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }
}
