//! Payment webhook endpoint.
//!
//! `POST /api/webhooks/payments` - signature verified, no session auth.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::webhook::{ProcessPaymentWebhookCommand, WebhookOutcome};

use super::state::AppState;

/// POST /api/webhooks/payments
///
/// 401 `{"error":"Unauthorized"}` when the delivery fails authentication,
/// 200 `{"received":true}` otherwise, including for internal failures so
/// the provider does not retry.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let signature = signature_from(
        &headers,
        &params,
        &state.settings.signature_header,
        &state.settings.signature_query_param,
    );

    let outcome = state
        .webhook
        .handle(ProcessPaymentWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await;

    let status = outcome.status_code();
    match outcome {
        WebhookOutcome::Rejected(_) => {
            (status, Json(serde_json::json!({ "error": "Unauthorized" }))).into_response()
        }
        _ => (status, Json(serde_json::json!({ "received": true }))).into_response(),
    }
}

/// Header value if present and non-blank, else the query parameter.
fn signature_from(
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    header_name: &str,
    query_param: &str,
) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| params.get(query_param).cloned())
}
