//! Access decisions and the pure entitlement rules behind them.
//!
//! The resolver in the application layer performs the lookups; everything
//! here is a pure function of (content, user, purchase) so the precedence
//! rules can be tested without any store.

use serde::{Deserialize, Serialize};

use super::content::{Content, ContentSummary};
use super::purchase::Purchase;
use super::user::User;

/// Why a caller was granted or denied access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    NotAuthenticated,
    CourseNotFound,
    /// Content exists but is not published yet.
    Unpublished,
    FreeCourse,
    IndividualPurchase,
    ClubMember,
    /// Session refers to an account that no longer exists.
    UserNotFound,
    NeedsPurchase,
    NeedsClubOrPurchase,
    Error,
}

impl AccessReason {
    /// Denials a purchase or subscription could lift (the paywall cases).
    pub fn is_entitlement_denial(&self) -> bool {
        matches!(
            self,
            AccessReason::NeedsPurchase | AccessReason::NeedsClubOrPurchase
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessReason::NotAuthenticated => "not_authenticated",
            AccessReason::CourseNotFound => "course_not_found",
            AccessReason::Unpublished => "unpublished",
            AccessReason::FreeCourse => "free_course",
            AccessReason::IndividualPurchase => "individual_purchase",
            AccessReason::ClubMember => "club_member",
            AccessReason::UserNotFound => "user_not_found",
            AccessReason::NeedsPurchase => "needs_purchase",
            AccessReason::NeedsClubOrPurchase => "needs_club_or_purchase",
            AccessReason::Error => "error",
        }
    }
}

/// Outcome of a single access check. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessDecision {
    pub has_access: bool,
    pub reason: AccessReason,
    /// Present whenever the content was found, so callers can render a
    /// header or paywall without a second lookup.
    pub content: Option<ContentSummary>,
}

impl AccessDecision {
    pub fn granted(reason: AccessReason, content: ContentSummary) -> Self {
        Self {
            has_access: true,
            reason,
            content: Some(content),
        }
    }

    pub fn denied(reason: AccessReason, content: Option<ContentSummary>) -> Self {
        Self {
            has_access: false,
            reason,
            content,
        }
    }

    pub fn not_authenticated() -> Self {
        Self::denied(AccessReason::NotAuthenticated, None)
    }

    pub fn course_not_found() -> Self {
        Self::denied(AccessReason::CourseNotFound, None)
    }

    /// Fail-closed decision for internal faults. Carries no metadata.
    pub fn error() -> Self {
        Self::denied(AccessReason::Error, None)
    }

    /// Metadata for a paywall, when the denial is one a purchase could lift.
    pub fn paywall(&self) -> Option<&ContentSummary> {
        if !self.has_access && self.reason.is_entitlement_denial() {
            self.content.as_ref()
        } else {
            None
        }
    }
}

/// Whether anonymous callers may see non-premium content.
///
/// `RequireLogin` keeps the established check order (identity before
/// everything). `Public` evaluates the free-content rule for anonymous
/// callers too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeContentPolicy {
    #[default]
    RequireLogin,
    Public,
}

/// Decision for content that needs no entitlement, if that applies.
pub fn free_access(content: &Content) -> Option<AccessDecision> {
    (!content.is_premium)
        .then(|| AccessDecision::granted(AccessReason::FreeCourse, content.summary()))
}

/// Applies the entitlement rules for a known user.
///
/// Precedence: free content, then a completed purchase, then an active club
/// subscription for club content. Anything else is a paywall denial.
/// `purchase` is the user's purchase of this content, if any.
pub fn evaluate_entitlement(
    content: &Content,
    user: &User,
    purchase: Option<&Purchase>,
) -> AccessDecision {
    if let Some(decision) = free_access(content) {
        return decision;
    }

    let purchased = purchase.map_or(false, |p| {
        p.is_completed() && p.user_id == user.id && p.content_id == content.id
    });
    if purchased {
        return AccessDecision::granted(AccessReason::IndividualPurchase, content.summary());
    }

    if content.is_in_club && user.subscription_status.grants_club_access() {
        return AccessDecision::granted(AccessReason::ClubMember, content.summary());
    }

    let reason = if content.is_in_club {
        AccessReason::NeedsClubOrPurchase
    } else {
        AccessReason::NeedsPurchase
    };
    AccessDecision::denied(reason, Some(content.summary()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::content::ContentType;
    use crate::domain::entitlement::purchase::PurchaseStatus;
    use crate::domain::entitlement::user::SubscriptionStatus;
    use crate::domain::foundation::ContentId;
    use rust_decimal::Decimal;

    fn content(is_premium: bool, is_in_club: bool) -> Content {
        Content {
            id: ContentId::new(),
            content_type: ContentType::Course,
            title: "Knife skills".to_string(),
            description: Some("Chop faster".to_string()),
            thumbnail_url: None,
            is_published: true,
            is_premium,
            is_in_club,
            price: Some(Decimal::new(2999, 2)),
        }
    }

    fn user(status: SubscriptionStatus) -> User {
        let mut user = User::register("cook@example.com", None, "hash".to_string());
        user.subscription_status = status;
        user
    }

    fn purchase_of(user: &User, content: &Content) -> Purchase {
        Purchase::completed(user.id.clone(), content.id, Decimal::ONE, "USD").unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Precedence
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn free_content_is_granted() {
        let c = content(false, false);
        let decision = evaluate_entitlement(&c, &user(SubscriptionStatus::Inactive), None);
        assert!(decision.has_access);
        assert_eq!(decision.reason, AccessReason::FreeCourse);
    }

    #[test]
    fn purchase_beats_lapsed_subscription() {
        let c = content(true, true);
        let u = user(SubscriptionStatus::Canceled);
        let p = purchase_of(&u, &c);

        let decision = evaluate_entitlement(&c, &u, Some(&p));

        assert!(decision.has_access);
        assert_eq!(decision.reason, AccessReason::IndividualPurchase);
    }

    #[test]
    fn purchase_reported_over_active_club_membership() {
        let c = content(true, true);
        let u = user(SubscriptionStatus::Active);
        let p = purchase_of(&u, &c);

        let decision = evaluate_entitlement(&c, &u, Some(&p));

        assert_eq!(decision.reason, AccessReason::IndividualPurchase);
    }

    #[test]
    fn pending_purchase_does_not_grant() {
        let c = content(true, false);
        let u = user(SubscriptionStatus::Inactive);
        let mut p = purchase_of(&u, &c);
        p.status = PurchaseStatus::Pending;

        let decision = evaluate_entitlement(&c, &u, Some(&p));

        assert!(!decision.has_access);
        assert_eq!(decision.reason, AccessReason::NeedsPurchase);
    }

    #[test]
    fn purchase_of_other_content_does_not_grant() {
        let c = content(true, false);
        let other = content(true, false);
        let u = user(SubscriptionStatus::Inactive);
        let p = purchase_of(&u, &other);

        assert!(!evaluate_entitlement(&c, &u, Some(&p)).has_access);
    }

    #[test]
    fn active_member_unlocks_club_content() {
        let c = content(true, true);
        let decision = evaluate_entitlement(&c, &user(SubscriptionStatus::Active), None);
        assert!(decision.has_access);
        assert_eq!(decision.reason, AccessReason::ClubMember);
    }

    #[test]
    fn active_member_still_needs_purchase_for_non_club_premium() {
        let c = content(true, false);
        let decision = evaluate_entitlement(&c, &user(SubscriptionStatus::Active), None);
        assert!(!decision.has_access);
        assert_eq!(decision.reason, AccessReason::NeedsPurchase);
    }

    #[test]
    fn past_due_member_needs_club_or_purchase() {
        let c = content(true, true);
        let decision = evaluate_entitlement(&c, &user(SubscriptionStatus::PastDue), None);
        assert_eq!(decision.reason, AccessReason::NeedsClubOrPurchase);
    }

    // ══════════════════════════════════════════════════════════════
    // Paywall metadata
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn denial_carries_paywall_metadata() {
        let c = content(true, true);
        let decision = evaluate_entitlement(&c, &user(SubscriptionStatus::Inactive), None);

        let paywall = decision.paywall().expect("paywall metadata");
        assert_eq!(paywall.title, "Knife skills");
        assert_eq!(paywall.price, Some(Decimal::new(2999, 2)));
        assert!(paywall.is_in_club);
    }

    #[test]
    fn granted_decision_has_no_paywall() {
        let c = content(false, false);
        let decision = evaluate_entitlement(&c, &user(SubscriptionStatus::Inactive), None);
        assert!(decision.paywall().is_none());
    }

    #[test]
    fn error_decision_is_closed_and_empty() {
        let decision = AccessDecision::error();
        assert!(!decision.has_access);
        assert!(decision.content.is_none());
        assert!(decision.paywall().is_none());
    }

    #[test]
    fn reasons_serialize_snake_case() {
        let json = serde_json::to_string(&AccessReason::NeedsClubOrPurchase).unwrap();
        assert_eq!(json, "\"needs_club_or_purchase\"");
        assert_eq!(AccessReason::Unpublished.as_str(), "unpublished");
    }

    #[test]
    fn free_access_only_for_non_premium() {
        assert!(free_access(&content(false, false)).is_some());
        assert!(free_access(&content(true, false)).is_none());
    }

    #[test]
    fn policy_defaults_to_require_login() {
        assert_eq!(FreeContentPolicy::default(), FreeContentPolicy::RequireLogin);
    }
}
