//! Access resolution properties and scenarios.
//!
//! Properties run against the pure entitlement rules; scenarios go through
//! `ResolveAccessHandler` over the in-memory store.

use std::str::FromStr;
use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use course_club::adapters::memory::InMemoryEntitlementStore;
use course_club::application::handlers::access::{ResolveAccessHandler, ResolveAccessQuery};
use course_club::domain::entitlement::{
    evaluate_entitlement, AccessReason, Content, ContentType, FreeContentPolicy, Purchase,
    SubscriptionStatus, User,
};
use course_club::domain::foundation::{ContentId, ErrorCode, UserId};
use course_club::ports::{PurchaseRepository, UserRepository};

// =============================================================================
// Strategies
// =============================================================================

fn status_strategy() -> impl Strategy<Value = SubscriptionStatus> {
    prop_oneof![
        Just(SubscriptionStatus::Active),
        Just(SubscriptionStatus::Inactive),
        Just(SubscriptionStatus::Canceled),
        Just(SubscriptionStatus::PastDue),
    ]
}

/// (is_premium, is_in_club) pairs allowed by the schema.
fn flags_strategy() -> impl Strategy<Value = (bool, bool)> {
    prop_oneof![Just((false, false)), Just((true, false)), Just((true, true))]
}

fn content(is_premium: bool, is_in_club: bool) -> Content {
    Content {
        id: ContentId::new(),
        content_type: ContentType::Course,
        title: "Sourdough basics".to_string(),
        description: Some("Starter to loaf".to_string()),
        thumbnail_url: None,
        is_published: true,
        is_premium,
        is_in_club,
        price: Some(Decimal::from_str("29.99").unwrap()),
    }
}

fn user(status: SubscriptionStatus) -> User {
    let mut user = User::register("baker@example.com", None, "hash".to_string());
    user.subscription_status = status;
    user
}

fn purchase_of(user: &User, content: &Content) -> Purchase {
    Purchase::completed(user.id.clone(), content.id, Decimal::new(2999, 2), "usd").unwrap()
}

proptest! {
    /// Property: non-premium content is granted whatever the user holds.
    #[test]
    fn prop_free_content_is_always_granted(
        status in status_strategy(),
        has_purchase in any::<bool>(),
    ) {
        let content = content(false, false);
        let user = user(status);
        let purchase = has_purchase.then(|| purchase_of(&user, &content));

        let decision = evaluate_entitlement(&content, &user, purchase.as_ref());

        prop_assert!(decision.has_access);
        prop_assert_eq!(decision.reason, AccessReason::FreeCourse);
    }

    /// Property: a completed purchase grants premium content in any status.
    #[test]
    fn prop_purchase_wins_over_subscription(
        status in status_strategy(),
        in_club in any::<bool>(),
    ) {
        let content = content(true, in_club);
        let user = user(status);
        let purchase = purchase_of(&user, &content);

        let decision = evaluate_entitlement(&content, &user, Some(&purchase));

        prop_assert!(decision.has_access);
        prop_assert_eq!(decision.reason, AccessReason::IndividualPurchase);
    }

    /// Property: without a purchase, premium content is granted only to
    /// ACTIVE members and only for club content.
    #[test]
    fn prop_premium_without_purchase_needs_active_club(
        status in status_strategy(),
        (is_premium, in_club) in flags_strategy(),
    ) {
        prop_assume!(is_premium);
        let content = content(is_premium, in_club);
        let user = user(status);

        let decision = evaluate_entitlement(&content, &user, None);

        let expected = match (in_club, status) {
            (true, SubscriptionStatus::Active) => AccessReason::ClubMember,
            (true, _) => AccessReason::NeedsClubOrPurchase,
            (false, _) => AccessReason::NeedsPurchase,
        };
        prop_assert_eq!(decision.reason, expected);
        prop_assert_eq!(decision.has_access, expected == AccessReason::ClubMember);
        if !decision.has_access {
            prop_assert!(decision.content.is_some(), "denials carry paywall metadata");
        }
    }

    /// Property: somebody else's purchase never unlocks content.
    #[test]
    fn prop_foreign_purchase_is_ignored(status in status_strategy()) {
        let content = content(true, false);
        let owner = user(SubscriptionStatus::Inactive);
        let caller = user(status);
        let purchase = purchase_of(&owner, &content);

        let decision = evaluate_entitlement(&content, &caller, Some(&purchase));

        prop_assert!(!decision.has_access);
        prop_assert_eq!(decision.reason, AccessReason::NeedsPurchase);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

fn resolver(store: &InMemoryEntitlementStore, policy: FreeContentPolicy) -> ResolveAccessHandler {
    let store = Arc::new(store.clone());
    ResolveAccessHandler::new(store.clone(), store.clone(), store).with_policy(policy)
}

#[tokio::test]
async fn premium_club_content_for_inactive_user_shows_paywall_with_price() {
    let store = InMemoryEntitlementStore::new();
    let course = content(true, true);
    let member = user(SubscriptionStatus::Inactive);
    store.insert_content(course.clone()).await;
    UserRepository::create(&store, &member).await.unwrap();

    let decision = resolver(&store, FreeContentPolicy::RequireLogin)
        .handle(ResolveAccessQuery::new(Some(member.id.clone()), course.id))
        .await;

    assert!(!decision.has_access);
    assert_eq!(decision.reason, AccessReason::NeedsClubOrPurchase);
    let paywall = decision.paywall().expect("paywall metadata");
    assert_eq!(paywall.price, Some(Decimal::from_str("29.99").unwrap()));
    assert!(paywall.is_in_club);
    assert_eq!(paywall.title, "Sourdough basics");
}

#[tokio::test]
async fn anonymous_free_content_requires_login_by_default() {
    let store = InMemoryEntitlementStore::new();
    let free = content(false, false);
    store.insert_content(free.clone()).await;

    let decision = resolver(&store, FreeContentPolicy::RequireLogin)
        .handle(ResolveAccessQuery::new(None, free.id))
        .await;

    assert!(!decision.has_access);
    assert_eq!(decision.reason, AccessReason::NotAuthenticated);
}

#[tokio::test]
async fn anonymous_free_content_is_open_under_public_policy() {
    let store = InMemoryEntitlementStore::new();
    let free = content(false, false);
    let premium = content(true, false);
    store.insert_content(free.clone()).await;
    store.insert_content(premium.clone()).await;
    let resolver = resolver(&store, FreeContentPolicy::Public);

    let free_decision = resolver.handle(ResolveAccessQuery::new(None, free.id)).await;
    let premium_decision = resolver.handle(ResolveAccessQuery::new(None, premium.id)).await;
    let missing = resolver.handle(ResolveAccessQuery::new(None, ContentId::new())).await;

    assert_eq!(free_decision.reason, AccessReason::FreeCourse);
    assert!(free_decision.has_access);
    assert_eq!(premium_decision.reason, AccessReason::NotAuthenticated);
    assert_eq!(missing.reason, AccessReason::CourseNotFound);
}

#[tokio::test]
async fn store_fault_fails_closed() {
    let store = InMemoryEntitlementStore::new();
    let course = content(true, true);
    store.insert_content(course.clone()).await;
    store.set_unavailable(true);

    let decision = resolver(&store, FreeContentPolicy::RequireLogin)
        .handle(ResolveAccessQuery::new(Some(UserId::generate()), course.id))
        .await;

    assert!(!decision.has_access);
    assert_eq!(decision.reason, AccessReason::Error);
}

#[tokio::test]
async fn second_purchase_for_same_pair_is_rejected_by_store() {
    let store = InMemoryEntitlementStore::new();
    let course = content(true, false);
    let buyer = user(SubscriptionStatus::Inactive);

    store.record_completed(&purchase_of(&buyer, &course)).await.unwrap();
    let err = store
        .record_completed(&purchase_of(&buyer, &course))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::PurchaseExists);
}
