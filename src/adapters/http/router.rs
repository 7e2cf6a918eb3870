//! Application router: routes, auth middleware and tower-http layers.

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::access::{check_content_access, course_page, lesson_page, vlog_page};
use super::account::{login, register, verify_email};
use super::admin::{record_purchase, update_subscription};
use super::middleware::auth_middleware;
use super::state::AppState;
use super::webhooks::payment_webhook;

const REQUEST_ID: &str = "x-request-id";

/// Builds the complete application router.
///
/// # Routes
///
/// ## Public
/// - `GET /health`
/// - `POST /api/webhooks/payments` - Signature verified
/// - `POST /api/auth/register`, `GET /api/auth/verify-email`, `POST /api/auth/login`
///
/// ## Session aware
/// - `GET /api/content/:id/access`
/// - `GET /courses/:id`, `GET /vlogs/:id`, `GET /courses/:id/lessons/:lesson_id`
///
/// ## Admin
/// - `POST /api/admin/purchases`
/// - `PUT /api/admin/users/:id/subscription`
pub fn app_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID);
    let timeout = state.settings.request_timeout;
    let cors = cors_layer(&state.settings.cors_origins);

    let api = Router::new()
        .route("/content/:id/access", get(check_content_access))
        .route("/webhooks/payments", post(payment_webhook))
        .route("/auth/register", post(register))
        .route("/auth/verify-email", get(verify_email))
        .route("/auth/login", post(login))
        .route("/admin/purchases", post(record_purchase))
        .route("/admin/users/:id/subscription", put(update_subscription));

    let pages = Router::new()
        .route("/courses/:id", get(course_page))
        .route("/vlogs/:id", get(vlog_page))
        .route("/courses/:id/lessons/:lesson_id", get(lesson_page));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .merge(pages)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(cors)
        .layer(TimeoutLayer::new(timeout))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        layer
    } else {
        layer.allow_origin(origins).allow_credentials(true)
    }
}
