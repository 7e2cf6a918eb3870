//! HS256 session tokens.
//!
//! Sessions are self-contained JWTs signed with the configured session
//! secret. The token subject is the user id; the email rides along so the
//! HTTP layer can build an `AuthenticatedUser` without a database round trip.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::{IssuedSession, SessionIssuer, SessionValidator};

/// Claims carried in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Issues and validates HS256 session tokens.
pub struct JwtSessions {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: i64,
}

impl JwtSessions {
    /// Creates a session codec. Fails if the secret is blank.
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Result<Self, AuthError> {
        let bytes = secret.expose_secret().as_bytes();
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AuthError::service_unavailable("session secret is empty"));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl_hours,
        })
    }
}

impl SessionIssuer for JwtSessions {
    fn issue(&self, user: &AuthenticatedUser) -> Result<IssuedSession, AuthError> {
        let now = Timestamp::now();
        let expires_at = now.plus_hours(self.ttl_hours);
        let claims = SessionClaims {
            sub: user.id.as_str().to_string(),
            email: user.email.clone(),
            iat: now.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::service_unavailable(format!("failed to sign session: {}", e)))?;

        Ok(IssuedSession {
            token,
            expires_in_secs: self.ttl_hours * 3600,
        })
    }
}

#[async_trait]
impl SessionValidator for JwtSessions {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Session token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!("Session token rejected: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = data.claims;
        let user_id = UserId::new(claims.sub).map_err(|_| {
            tracing::warn!("Session token has an empty subject");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, claims.email))
    }
}
