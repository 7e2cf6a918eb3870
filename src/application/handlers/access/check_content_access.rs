//! CheckContentAccessHandler - access check for non-page callers.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::entitlement::{AccessDecision, AccessReason, ContentType};
use crate::domain::foundation::{ContentId, UserId};

use super::resolve_access::{ResolveAccessHandler, ResolveAccessQuery};

/// Query for the access-check endpoint.
#[derive(Debug, Clone)]
pub struct CheckContentAccessQuery {
    pub user_id: Option<UserId>,
    pub content_id: ContentId,
}

/// Flat access view returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAccessView {
    pub has_access: bool,
    pub reason: AccessReason,
    pub course_title: Option<String>,
    pub is_premium: Option<bool>,
    pub content_type: Option<ContentType>,
}

/// Handler for API access checks.
///
/// Publication gates everything: unpublished content is denied whatever
/// the caller has purchased or subscribed to.
pub struct CheckContentAccessHandler {
    resolver: Arc<ResolveAccessHandler>,
}

impl CheckContentAccessHandler {
    pub fn new(resolver: Arc<ResolveAccessHandler>) -> Self {
        Self { resolver }
    }

    pub async fn handle(&self, query: CheckContentAccessQuery) -> ContentAccessView {
        let decision = self
            .resolver
            .handle_published(ResolveAccessQuery::new(query.user_id, query.content_id))
            .await;

        ContentAccessView::from(decision)
    }
}

impl From<AccessDecision> for ContentAccessView {
    fn from(decision: AccessDecision) -> Self {
        let content = decision.content.as_ref();
        ContentAccessView {
            has_access: decision.has_access,
            reason: decision.reason,
            course_title: content.map(|c| c.title.clone()),
            is_premium: content.map(|c| c.is_premium),
            content_type: content.map(|c| c.content_type),
        }
    }
}
