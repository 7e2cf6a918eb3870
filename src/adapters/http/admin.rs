//! Admin endpoints. Callers must hold the ADMIN role.
//!
//! - `POST /api/admin/purchases` - Record a completed individual purchase
//! - `PUT /api/admin/users/:id/subscription` - Set a user's subscription status

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::admin::UpdateSubscriptionStatusCommand;
use crate::application::handlers::purchase::RecordPurchaseCommand;
use crate::domain::foundation::{DomainError, UserId};

use super::dto::{
    PurchaseResponse, RecordPurchaseRequest, SubscriptionResponse, UpdateSubscriptionRequest,
};
use super::error::ApiError;
use super::middleware::RequireAuth;
use super::state::AppState;

/// POST /api/admin/purchases
pub async fn record_purchase(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(request): Json<RecordPurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::new(request.user_id).map_err(DomainError::from)?;

    let result = state
        .record_purchase
        .handle(RecordPurchaseCommand {
            actor: actor.id,
            user_id,
            content_id: request.content_id,
            amount: request.amount,
            currency: request.currency,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PurchaseResponse::from(result.purchase))))
}

/// PUT /api/admin/users/:id/subscription
pub async fn update_subscription(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::new(id).map_err(DomainError::from)?;

    let result = state
        .update_subscription
        .handle(UpdateSubscriptionStatusCommand {
            actor: actor.id,
            user_id,
            status: request.status,
        })
        .await?;

    Ok(Json(SubscriptionResponse {
        user_id: result.user_id,
        status: result.status,
    }))
}
