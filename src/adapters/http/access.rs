//! Access-check endpoint and guarded page routes.
//!
//! - `GET /api/content/:id/access` - Flat access view for API callers
//! - `GET /courses/:id` - Course page
//! - `GET /vlogs/:id` - Vlog page
//! - `GET /courses/:id/lessons/:lesson_id` - Lesson page

use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use reqwest::Url;

use crate::application::handlers::access::{
    CheckContentAccessQuery, ContentAccessView, GuardOutcome,
};
use crate::domain::entitlement::{AccessDecision, AccessReason, ContentType, FreeContentPolicy};
use crate::domain::foundation::{ContentId, LessonId};

use super::dto::{LessonView, PageResponse, PaywallResponse};
use super::error::ErrorResponse;
use super::middleware::OptionalAuth;
use super::state::AppState;

// ════════════════════════════════════════════════════════════════════════════════
// API
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/content/:id/access
pub async fn check_content_access(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<String>,
) -> Response {
    let user_id = user.map(|u| u.id);

    let view = match id.parse::<ContentId>() {
        Ok(content_id) => {
            state
                .check_access
                .handle(CheckContentAccessQuery {
                    user_id,
                    content_id,
                })
                .await
        }
        // Unparseable ids cannot exist; answer as the resolver would for a
        // missing row.
        Err(_) => {
            let anonymous_blocked = user_id.is_none()
                && state.resolver.policy() == FreeContentPolicy::RequireLogin;
            ContentAccessView::from(if anonymous_blocked {
                AccessDecision::not_authenticated()
            } else {
                AccessDecision::course_not_found()
            })
        }
    };

    let status = match view.reason {
        AccessReason::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AccessReason::CourseNotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    (status, Json(view)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Pages
// ════════════════════════════════════════════════════════════════════════════════

/// GET /courses/:id
pub async fn course_page(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    content_page(state, user.map(|u| u.id), uri.to_string(), &id, ContentType::Course).await
}

/// GET /vlogs/:id
pub async fn vlog_page(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    content_page(state, user.map(|u| u.id), uri.to_string(), &id, ContentType::Vlog).await
}

/// GET /courses/:id/lessons/:lesson_id
pub async fn lesson_page(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    OriginalUri(uri): OriginalUri,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Response {
    let (Ok(course_id), Ok(lesson_id)) =
        (course_id.parse::<ContentId>(), lesson_id.parse::<LessonId>())
    else {
        return not_found();
    };

    let caller = user.map(|u| u.id);
    let outcome = state
        .guard
        .guard_lesson(caller.as_ref(), course_id, lesson_id, &uri.to_string())
        .await;
    page_response(outcome, &state.settings.login_path)
}

async fn content_page(
    state: AppState,
    caller: Option<crate::domain::foundation::UserId>,
    return_to: String,
    id: &str,
    content_type: ContentType,
) -> Response {
    let Ok(content_id) = id.parse::<ContentId>() else {
        return not_found();
    };

    let outcome = state
        .guard
        .guard_content(caller.as_ref(), content_id, content_type, &return_to)
        .await;
    page_response(outcome, &state.settings.login_path)
}

/// Maps a guard outcome onto the wire.
pub fn page_response(outcome: GuardOutcome, login_path: &str) -> Response {
    match outcome {
        GuardOutcome::Render(grant) => Json(PageResponse {
            content: grant.content,
            lesson: grant.lesson.map(LessonView::from),
            unlocked_by: grant.unlocked_by.as_str(),
        })
        .into_response(),
        GuardOutcome::Paywall { content, reason } => (
            StatusCode::PAYMENT_REQUIRED,
            Json(PaywallResponse { content, reason }),
        )
            .into_response(),
        GuardOutcome::NotFound => not_found(),
        GuardOutcome::Login { return_to } => {
            Redirect::to(&login_redirect(login_path, &return_to)).into_response()
        }
        GuardOutcome::Deny => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("FORBIDDEN", "Access denied")),
        )
            .into_response(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("NOT_FOUND", "Not found")),
    )
        .into_response()
}

/// `{login_path}?callbackUrl={return_to}`, with the callback percent-encoded.
pub fn login_redirect(login_path: &str, return_to: &str) -> String {
    let mut url = match Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(_) => return login_path.to_string(),
    };
    url.set_path(login_path);
    url.query_pairs_mut().append_pair("callbackUrl", return_to);

    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
