//! Account endpoints.
//!
//! - `POST /api/auth/register` - Create an account, email a verification link
//! - `GET /api/auth/verify-email` - Consume a verification token
//! - `POST /api/auth/login` - Issue a session token (body and cookie)

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::account::{LoginCommand, RegisterUserCommand, VerifyEmailCommand};

use super::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, VerifyEmailParams,
    VerifyEmailResponse,
};
use super::error::ApiError;
use super::state::{AppState, HttpSettings};

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .register
        .handle(RegisterUserCommand {
            email: request.email,
            password: request.password,
            name: request.name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: result.user_id,
            email: result.email,
        }),
    ))
}

/// GET /api/auth/verify-email?email=&token=
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .verify_email
        .handle(VerifyEmailCommand {
            email: params.email,
            token: params.token,
        })
        .await?;

    Ok(Json(VerifyEmailResponse {
        email: result.email,
        verified: true,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .login
        .handle(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    let cookie = session_cookie(&state.settings, &result.token, result.expires_in_secs);
    let mut response = Json(LoginResponse {
        user_id: result.user_id,
        token: result.token,
        expires_in: result.expires_in_secs,
    })
    .into_response();

    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

fn session_cookie(settings: &HttpSettings, token: &str, max_age_secs: i64) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        settings.session_cookie, token, max_age_secs
    );
    if settings.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}
