//! ResolveAccessHandler - decides whether a caller may view a piece of content.

use std::sync::Arc;

use crate::domain::entitlement::{
    evaluate_entitlement, free_access, AccessDecision, AccessReason, Content, FreeContentPolicy,
};
use crate::domain::foundation::{ContentId, DomainError, UserId};
use crate::ports::{ContentReader, PurchaseRepository, UserRepository};

/// Query to resolve access for one (caller, content) pair.
#[derive(Debug, Clone)]
pub struct ResolveAccessQuery {
    /// Identity from the trusted request context. `None` for anonymous callers.
    pub user_id: Option<UserId>,
    pub content_id: ContentId,
}

impl ResolveAccessQuery {
    pub fn new(user_id: Option<UserId>, content_id: ContentId) -> Self {
        Self {
            user_id,
            content_id,
        }
    }
}

/// Resolves access decisions against the entitlement store.
///
/// Order of checks:
/// 1. caller identity (skipped for free content under `FreeContentPolicy::Public`)
/// 2. content exists
/// 3. content is free
/// 4. user exists
/// 5. completed purchase
/// 6. active club membership for club content
///
/// [`handle`](Self::handle) never fails: store faults become an `error`
/// decision, which denies access.
pub struct ResolveAccessHandler {
    users: Arc<dyn UserRepository>,
    contents: Arc<dyn ContentReader>,
    purchases: Arc<dyn PurchaseRepository>,
    policy: FreeContentPolicy,
}

impl ResolveAccessHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        contents: Arc<dyn ContentReader>,
        purchases: Arc<dyn PurchaseRepository>,
    ) -> Self {
        Self {
            users,
            contents,
            purchases,
            policy: FreeContentPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FreeContentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FreeContentPolicy {
        self.policy
    }

    /// Resolves access, failing closed on any internal error.
    pub async fn handle(&self, query: ResolveAccessQuery) -> AccessDecision {
        self.resolve_or_deny(&query, false).await
    }

    /// Like [`handle`](Self::handle), but unpublished content is always
    /// denied with reason `unpublished`, ahead of every entitlement rule.
    pub async fn handle_published(&self, query: ResolveAccessQuery) -> AccessDecision {
        self.resolve_or_deny(&query, true).await
    }

    async fn resolve_or_deny(
        &self,
        query: &ResolveAccessQuery,
        require_published: bool,
    ) -> AccessDecision {
        match self.resolve(query, require_published).await {
            Ok(decision) => decision,
            Err(error) => {
                tracing::error!(
                    content_id = %query.content_id,
                    user_id = query.user_id.as_ref().map(|id| id.as_str()),
                    error = %error,
                    "Access resolution failed, denying"
                );
                AccessDecision::error()
            }
        }
    }

    async fn resolve(
        &self,
        query: &ResolveAccessQuery,
        require_published: bool,
    ) -> Result<AccessDecision, DomainError> {
        if query.user_id.is_none() && self.policy == FreeContentPolicy::RequireLogin {
            return Ok(AccessDecision::not_authenticated());
        }

        let content = match self.contents.find_content(&query.content_id).await? {
            Some(content) => content,
            None => return Ok(AccessDecision::course_not_found()),
        };

        if require_published && !content.is_published {
            return Ok(AccessDecision::denied(
                AccessReason::Unpublished,
                Some(content.summary()),
            ));
        }

        self.decide_for_content(query.user_id.as_ref(), &content)
            .await
    }

    /// Applies steps 3 onwards to content the caller already loaded.
    async fn decide_for_content(
        &self,
        user_id: Option<&UserId>,
        content: &Content,
    ) -> Result<AccessDecision, DomainError> {
        if let Some(decision) = free_access(content) {
            return Ok(decision);
        }

        let user_id = match user_id {
            Some(user_id) => user_id,
            None => return Ok(AccessDecision::not_authenticated()),
        };

        let user = match self.users.find_by_id(user_id).await? {
            Some(user) => user,
            None => {
                tracing::warn!(user_id = %user_id, "Session refers to a missing user");
                return Ok(AccessDecision::denied(
                    AccessReason::UserNotFound,
                    Some(content.summary()),
                ));
            }
        };

        let purchase = self.purchases.find_completed(user_id, &content.id).await?;
        Ok(evaluate_entitlement(content, &user, purchase.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryEntitlementStore;
    use crate::domain::entitlement::{ContentType, Purchase, SubscriptionStatus, User};
    use rust_decimal::Decimal;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn handler(store: &InMemoryEntitlementStore) -> ResolveAccessHandler {
        let store = Arc::new(store.clone());
        ResolveAccessHandler::new(store.clone(), store.clone(), store)
    }

    fn content(is_premium: bool, is_in_club: bool) -> Content {
        Content {
            id: ContentId::new(),
            content_type: ContentType::Course,
            title: "Pasta from scratch".to_string(),
            description: None,
            thumbnail_url: None,
            is_published: true,
            is_premium,
            is_in_club,
            price: Some(Decimal::new(2999, 2)),
        }
    }

    async fn seed_user(store: &InMemoryEntitlementStore, status: SubscriptionStatus) -> User {
        let email = format!("{}@example.com", UserId::generate());
        let mut user = User::register(email, None, "h".into());
        user.subscription_status = status;
        UserRepository::create(store, &user).await.unwrap();
        user
    }

    async fn seed_content(store: &InMemoryEntitlementStore, content: Content) -> Content {
        store.insert_content(content.clone()).await;
        content
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Check Ordering
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn anonymous_caller_is_not_authenticated_before_lookup() {
        let store = InMemoryEntitlementStore::new();
        store.set_unavailable(true);

        // No lookup happens, so the unavailable store is never touched.
        let decision = handler(&store)
            .handle(ResolveAccessQuery::new(None, ContentId::new()))
            .await;

        assert_eq!(decision.reason, AccessReason::NotAuthenticated);
        assert!(decision.content.is_none());
    }

    #[tokio::test]
    async fn anonymous_caller_needs_login_even_for_free_content() {
        let store = InMemoryEntitlementStore::new();
        let free = seed_content(&store, content(false, false)).await;

        let decision = handler(&store)
            .handle(ResolveAccessQuery::new(None, free.id))
            .await;

        assert!(!decision.has_access);
        assert_eq!(decision.reason, AccessReason::NotAuthenticated);
    }

    #[tokio::test]
    async fn public_policy_lets_anonymous_see_free_content() {
        let store = InMemoryEntitlementStore::new();
        let free = seed_content(&store, content(false, false)).await;
        let premium = seed_content(&store, content(true, false)).await;
        let handler = handler(&store).with_policy(FreeContentPolicy::Public);

        let free_decision = handler.handle(ResolveAccessQuery::new(None, free.id)).await;
        let premium_decision = handler.handle(ResolveAccessQuery::new(None, premium.id)).await;
        let missing = handler.handle(ResolveAccessQuery::new(None, ContentId::new())).await;

        assert!(free_decision.has_access);
        assert_eq!(free_decision.reason, AccessReason::FreeCourse);
        assert_eq!(premium_decision.reason, AccessReason::NotAuthenticated);
        assert_eq!(missing.reason, AccessReason::CourseNotFound);
    }

    #[tokio::test]
    async fn missing_content_is_course_not_found() {
        let store = InMemoryEntitlementStore::new();
        let user = seed_user(&store, SubscriptionStatus::Active).await;

        let decision = handler(&store)
            .handle(ResolveAccessQuery::new(Some(user.id), ContentId::new()))
            .await;

        assert_eq!(decision.reason, AccessReason::CourseNotFound);
    }

    #[tokio::test]
    async fn free_content_granted_before_user_lookup() {
        let store = InMemoryEntitlementStore::new();
        let free = seed_content(&store, content(false, false)).await;

        let decision = handler(&store)
            .handle(ResolveAccessQuery::new(Some(UserId::new("ghost").unwrap()), free.id))
            .await;

        assert!(decision.has_access);
        assert_eq!(decision.reason, AccessReason::FreeCourse);
    }

    #[tokio::test]
    async fn dangling_session_is_user_not_found() {
        let store = InMemoryEntitlementStore::new();
        let premium = seed_content(&store, content(true, true)).await;

        let decision = handler(&store)
            .handle(ResolveAccessQuery::new(Some(UserId::new("ghost").unwrap()), premium.id))
            .await;

        assert!(!decision.has_access);
        assert_eq!(decision.reason, AccessReason::UserNotFound);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Entitlements
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn completed_purchase_grants_with_inactive_subscription() {
        let store = InMemoryEntitlementStore::new();
        let premium = seed_content(&store, content(true, true)).await;
        let user = seed_user(&store, SubscriptionStatus::Inactive).await;
        let purchase =
            Purchase::completed(user.id.clone(), premium.id, Decimal::new(2999, 2), "USD").unwrap();
        store.record_completed(&purchase).await.unwrap();

        let decision = handler(&store)
            .handle(ResolveAccessQuery::new(Some(user.id), premium.id))
            .await;

        assert!(decision.has_access);
        assert_eq!(decision.reason, AccessReason::IndividualPurchase);
    }

    #[tokio::test]
    async fn inactive_user_sees_club_paywall_with_price() {
        let store = InMemoryEntitlementStore::new();
        let premium = seed_content(&store, content(true, true)).await;
        let user = seed_user(&store, SubscriptionStatus::Inactive).await;

        let decision = handler(&store)
            .handle(ResolveAccessQuery::new(Some(user.id), premium.id))
            .await;

        assert!(!decision.has_access);
        assert_eq!(decision.reason, AccessReason::NeedsClubOrPurchase);
        assert_eq!(decision.paywall().unwrap().price, Some(Decimal::new(2999, 2)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Publication Gate
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unpublished_content_denied_even_when_free() {
        let store = InMemoryEntitlementStore::new();
        let mut draft = content(false, false);
        draft.is_published = false;
        let draft = seed_content(&store, draft).await;
        let user = seed_user(&store, SubscriptionStatus::Active).await;

        let gated = handler(&store)
            .handle_published(ResolveAccessQuery::new(Some(user.id.clone()), draft.id))
            .await;
        let ungated = handler(&store)
            .handle(ResolveAccessQuery::new(Some(user.id), draft.id))
            .await;

        assert!(!gated.has_access);
        assert_eq!(gated.reason, AccessReason::Unpublished);
        assert!(ungated.has_access);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn store_fault_fails_closed() {
        let store = InMemoryEntitlementStore::new();
        let premium = seed_content(&store, content(true, true)).await;
        let user = seed_user(&store, SubscriptionStatus::Active).await;
        store.set_unavailable(true);

        let decision = handler(&store)
            .handle(ResolveAccessQuery::new(Some(user.id), premium.id))
            .await;

        assert_eq!(decision, AccessDecision::error());
    }

    #[tokio::test]
    async fn store_fault_denies_with_error_reason() {
        let store = InMemoryEntitlementStore::new();
        store.set_unavailable(true);
        let query = ResolveAccessQuery::new(Some(UserId::new("u").unwrap()), ContentId::new());

        let decision = handler(&store).handle_published(query).await;

        assert_eq!(decision, AccessDecision::error());
    }
}
