//! Request and response bodies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entitlement::{
    AccessReason, ContentSummary, Lesson, Purchase, PurchaseStatus, SubscriptionStatus,
};
use crate::domain::foundation::{ContentId, LessonId, PurchaseId, UserId};

// ════════════════════════════════════════════════════════════════════════════════
// Pages
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonView {
    pub id: LessonId,
    pub course_id: ContentId,
    pub title: String,
    pub body: Option<String>,
    pub video_url: Option<String>,
    pub position: i32,
    pub is_free: bool,
}

impl From<Lesson> for LessonView {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.content_id,
            title: lesson.title,
            body: lesson.body,
            video_url: lesson.video_url,
            position: lesson.position,
            is_free: lesson.is_free,
        }
    }
}

/// Body of a rendered course, vlog or lesson page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub content: ContentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson: Option<LessonView>,
    pub unlocked_by: &'static str,
}

/// Body of a 402 upsell.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaywallResponse {
    pub content: ContentSummary,
    pub reason: AccessReason,
}

// ════════════════════════════════════════════════════════════════════════════════
// Account
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailParams {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponse {
    pub email: String,
    pub verified: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: UserId,
    pub token: String,
    pub expires_in: i64,
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct RecordPurchaseRequest {
    pub user_id: String,
    pub content_id: ContentId,
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub content_id: ContentId,
    pub amount: Decimal,
    pub currency: String,
    pub status: PurchaseStatus,
}

impl From<Purchase> for PurchaseResponse {
    fn from(purchase: Purchase) -> Self {
        Self {
            id: purchase.id,
            user_id: purchase.user_id,
            content_id: purchase.content_id,
            amount: purchase.amount,
            currency: purchase.currency,
            status: purchase.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub status: SubscriptionStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub user_id: UserId,
    pub status: SubscriptionStatus,
}
