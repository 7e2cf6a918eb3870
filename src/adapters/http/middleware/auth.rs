//! Authentication middleware and extractors for axum.
//!
//! - `auth_middleware` - Validates the session token and injects the caller
//! - `RequireAuth` - Extractor that requires authentication
//! - `OptionalAuth` - Extractor for optional authentication
//!
//! The token comes from `Authorization: Bearer <token>` or, for browser page
//! loads, the session cookie. The middleware never rejects a request: a bad
//! token leaves the request anonymous and records a [`SessionFailure`], which
//! `RequireAuth` turns into a 401. Page guards see an anonymous caller.
//!
//! ```text
//! Request → auth_middleware → AuthenticatedUser | SessionFailure in extensions
//!                                      ↓
//!                   Handler → RequireAuth / OptionalAuth read extensions
//! ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};

use super::super::state::AppState;

/// Why a presented session token was not accepted.
#[derive(Debug, Clone)]
pub struct SessionFailure(pub AuthError);

/// Authentication middleware.
///
/// 1. Reads a Bearer token, falling back to the session cookie
/// 2. Validates it with the `SessionValidator` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On failure, injects `SessionFailure` and continues anonymously
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(request.headers(), &state.settings.session_cookie);

    if let Some(token) = token {
        match state.session_validator.validate(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => {
                match &e {
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!("Session validation unavailable: {}", msg);
                    }
                    other => tracing::debug!("Session token not accepted: {}", other),
                }
                request.extensions_mut().insert(SessionFailure(e));
            }
        }
    }

    next.run(request).await
}

/// Session token from the Authorization header or the named cookie.
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Extractor that requires authentication.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(RequireAuth(user.clone()));
        }
        match parts.extensions.get::<SessionFailure>() {
            Some(SessionFailure(AuthError::TokenExpired)) => Err(AuthRejection::Expired),
            Some(SessionFailure(AuthError::ServiceUnavailable(_))) => {
                Err(AuthRejection::Unavailable)
            }
            _ => Err(AuthRejection::Unauthenticated),
        }
    }
}

/// Extractor for optional authentication. `None` for anonymous callers and
/// for callers whose token was not accepted.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    Unauthenticated,
    Expired,
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthRejection::Expired => (StatusCode::UNAUTHORIZED, "Session expired"),
            AuthRejection::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Authentication service unavailable",
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "errorCode": "UNAUTHENTICATED",
                "message": message
            })),
        )
            .into_response()
    }
}
