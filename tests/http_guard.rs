//! Router-level tests: guarded pages, the access endpoint and webhooks.

use std::str::FromStr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tower::ServiceExt;

use course_club::adapters::auth::{JwtSessions, MockSessionValidator};
use course_club::adapters::email::LoggingEmailSender;
use course_club::adapters::http::{app_router, AppPorts, AppState, HttpSettings};
use course_club::adapters::memory::InMemoryEntitlementStore;
use course_club::adapters::security::Argon2PasswordHasher;
use course_club::domain::entitlement::{
    Content, ContentType, Lesson, Role, SubscriptionStatus, User, WebhookVerifier,
};
use course_club::domain::foundation::{ContentId, LessonId, UserId};
use course_club::ports::UserRepository;

const WEBHOOK_SECRET: &str = "whsec_router_tests";
const MEMBER_TOKEN: &str = "member-token";
const OUTSIDER_TOKEN: &str = "outsider-token";
const ADMIN_TOKEN: &str = "admin-token";

// ════════════════════════════════════════════════════════════════════════════
// Fixture
// ════════════════════════════════════════════════════════════════════════════

struct Fixture {
    store: InMemoryEntitlementStore,
    app: Router,
    club_course: Content,
    outsider_id: UserId,
    free_lesson: Lesson,
    paid_lesson: Lesson,
}

fn club_course() -> Content {
    Content {
        id: ContentId::new(),
        content_type: ContentType::Course,
        title: "Knife skills".to_string(),
        description: Some("Dice, julienne, chiffonade".to_string()),
        thumbnail_url: None,
        is_published: true,
        is_premium: true,
        is_in_club: true,
        price: Some(Decimal::from_str("29.99").unwrap()),
    }
}

fn lesson(course: &Content, position: i32, is_free: bool) -> Lesson {
    Lesson {
        id: LessonId::new(),
        content_id: course.id,
        title: format!("Lesson {}", position),
        body: None,
        video_url: None,
        position,
        is_free,
    }
}

async fn fixture() -> Fixture {
    let store = InMemoryEntitlementStore::new();
    let course = club_course();
    let free_lesson = lesson(&course, 1, true);
    let paid_lesson = lesson(&course, 2, false);
    store.insert_content(course.clone()).await;
    store.insert_lesson(free_lesson.clone()).await;
    store.insert_lesson(paid_lesson.clone()).await;

    let mut member = User::register("member@example.com", None, "h".to_string());
    member.subscription_status = SubscriptionStatus::Active;
    let outsider = User::register("outsider@example.com", None, "h".to_string());
    UserRepository::create(&store, &member).await.unwrap();
    let mut admin = User::register("admin@example.com", None, "h".to_string());
    admin.role = Role::Admin;
    UserRepository::create(&store, &outsider).await.unwrap();
    UserRepository::create(&store, &admin).await.unwrap();

    let validator = MockSessionValidator::new()
        .with_test_user(MEMBER_TOKEN, &member.id)
        .with_test_user(OUTSIDER_TOKEN, &outsider.id)
        .with_test_user(ADMIN_TOKEN, &admin.id);
    let sessions = JwtSessions::new(
        &SecretString::new("a-session-secret-of-at-least-32-bytes".to_string()),
        24,
    )
    .unwrap();
    let shared = Arc::new(store.clone());

    let ports = AppPorts {
        users: shared.clone(),
        contents: shared.clone(),
        purchases: shared.clone(),
        verification_tokens: shared,
        session_validator: Arc::new(validator),
        session_issuer: Arc::new(sessions),
        password_hasher: Arc::new(Argon2PasswordHasher::default()),
        email_sender: Arc::new(LoggingEmailSender),
    };
    let settings = HttpSettings {
        webhook_secret: Some(SecretString::new(WEBHOOK_SECRET.to_string())),
        ..HttpSettings::default()
    };

    Fixture {
        store,
        app: app_router(AppState::new(ports, settings)),
        club_course: course,
        outsider_id: outsider.id,
        free_lesson,
        paid_lesson,
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ════════════════════════════════════════════════════════════════════════════
// Pages
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn anonymous_page_request_redirects_to_login_with_callback() {
    let fx = fixture().await;
    let path = format!("/courses/{}", fx.club_course.id);

    let response = fx.app.oneshot(get(&path, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert_eq!(
        location,
        format!("/login?callbackUrl=%2Fcourses%2F{}", fx.club_course.id)
    );
}

#[tokio::test]
async fn outsider_sees_paywall_with_price() {
    let fx = fixture().await;
    let path = format!("/courses/{}", fx.club_course.id);

    let response = fx.app.oneshot(get(&path, Some(OUTSIDER_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body = json_body(response).await;
    assert_eq!(body["reason"], "needs_club_or_purchase");
    assert_eq!(body["content"]["title"], "Knife skills");
    let price = body["content"]["price"].as_f64().unwrap();
    assert!((price - 29.99).abs() < 1e-9);
}

#[tokio::test]
async fn member_page_renders() {
    let fx = fixture().await;
    let path = format!("/courses/{}", fx.club_course.id);

    let response = fx.app.oneshot(get(&path, Some(MEMBER_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["unlockedBy"], "club_member");
    assert!(body.get("lesson").is_none());
}

#[tokio::test]
async fn course_id_on_vlog_route_is_not_found() {
    let fx = fixture().await;
    let path = format!("/vlogs/{}", fx.club_course.id);

    let response = fx.app.oneshot(get(&path, Some(MEMBER_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_page_id_is_not_found() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(get("/courses/not-a-uuid", Some(MEMBER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn free_lesson_unlocks_behind_paywall() {
    let fx = fixture().await;
    let path = format!(
        "/courses/{}/lessons/{}",
        fx.club_course.id, fx.free_lesson.id
    );

    let response = fx.app.oneshot(get(&path, Some(OUTSIDER_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["unlockedBy"], "free_lesson");
    assert_eq!(body["lesson"]["title"], "Lesson 1");
}

#[tokio::test]
async fn paid_lesson_stays_behind_paywall() {
    let fx = fixture().await;
    let path = format!(
        "/courses/{}/lessons/{}",
        fx.club_course.id, fx.paid_lesson.id
    );

    let response = fx.app.oneshot(get(&path, Some(OUTSIDER_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn store_outage_denies_page() {
    let fx = fixture().await;
    fx.store.set_unavailable(true);
    let path = format!("/courses/{}", fx.club_course.id);

    let response = fx.app.oneshot(get(&path, Some(MEMBER_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ════════════════════════════════════════════════════════════════════════════
// Access Endpoint
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn access_endpoint_reports_member_grant() {
    let fx = fixture().await;
    let path = format!("/api/content/{}/access", fx.club_course.id);

    let response = fx.app.oneshot(get(&path, Some(MEMBER_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["hasAccess"], true);
    assert_eq!(body["reason"], "club_member");
    assert_eq!(body["courseTitle"], "Knife skills");
    assert_eq!(body["contentType"], "course");
}

#[tokio::test]
async fn access_endpoint_rejects_anonymous_caller() {
    let fx = fixture().await;
    let path = format!("/api/content/{}/access", fx.club_course.id);

    let response = fx.app.oneshot(get(&path, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["reason"], "not_authenticated");
}

#[tokio::test]
async fn access_endpoint_reports_missing_content() {
    let fx = fixture().await;
    let path = format!("/api/content/{}/access", ContentId::new());

    let response = fx.app.oneshot(get(&path, Some(MEMBER_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ════════════════════════════════════════════════════════════════════════════
// Admin
// ════════════════════════════════════════════════════════════════════════════

fn purchase_request(token: &str, user_id: &UserId, content_id: ContentId) -> Request<Body> {
    let body = serde_json::json!({
        "user_id": user_id.as_str(),
        "content_id": content_id.to_string(),
        "amount": 29.99,
        "currency": "usd"
    });
    Request::builder()
        .method("POST")
        .uri("/api/admin/purchases")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn admin_purchase_unlocks_course_for_buyer() {
    let fx = fixture().await;
    let page = format!("/courses/{}", fx.club_course.id);

    let recorded = fx
        .app
        .clone()
        .oneshot(purchase_request(ADMIN_TOKEN, &fx.outsider_id, fx.club_course.id))
        .await
        .unwrap();
    let duplicate = fx
        .app
        .clone()
        .oneshot(purchase_request(ADMIN_TOKEN, &fx.outsider_id, fx.club_course.id))
        .await
        .unwrap();
    let response = fx.app.oneshot(get(&page, Some(OUTSIDER_TOKEN))).await.unwrap();

    assert_eq!(recorded.status(), StatusCode::CREATED);
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["unlockedBy"], "individual_purchase");
}

#[tokio::test]
async fn non_admin_cannot_record_purchase() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(purchase_request(OUTSIDER_TOKEN, &fx.outsider_id, fx.club_course.id))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_route_requires_session() {
    let fx = fixture().await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/admin/users/{}/subscription", fx.outsider_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"status":"ACTIVE"}"#))
        .unwrap();

    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ════════════════════════════════════════════════════════════════════════════
// Webhooks
// ════════════════════════════════════════════════════════════════════════════

fn webhook_request(body: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/payments")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header("x-webhook-signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn sign(body: &str) -> String {
    WebhookVerifier::new(SecretString::new(WEBHOOK_SECRET.to_string()))
        .unwrap()
        .sign(body.as_bytes())
        .unwrap()
}

const PAID: &str =
    r#"{"order_status":"paid","Customer":{"email":"new@example.com","full_name":"New Member"}}"#;

#[tokio::test]
async fn signed_webhook_is_acknowledged_and_applied() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(webhook_request(PAID, Some(sign(PAID))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({ "received": true }));
    let users = fx.store.users_with_email("new@example.com").await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].subscription_status, SubscriptionStatus::Active);
}

#[tokio::test]
async fn badly_signed_webhook_is_unauthorized() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(webhook_request(PAID, Some("00ff".to_string())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "Unauthorized" })
    );
    assert!(fx.store.users_with_email("new@example.com").await.is_empty());
}

#[tokio::test]
async fn signature_may_arrive_as_query_parameter() {
    let fx = fixture().await;
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/webhooks/payments?signature={}", sign(PAID)))
        .body(Body::from(PAID))
        .unwrap();

    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_is_open() {
    let fx = fixture().await;

    let response = fx.app.oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
