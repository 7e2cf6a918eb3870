//! In-Memory Entitlement Store
//!
//! Users, content, lessons, purchases and verification tokens in memory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entitlement::{
    Content, Lesson, Purchase, PurchaseStatus, SubscriptionStatus, User, VerificationToken,
};
use crate::domain::foundation::{ContentId, DomainError, ErrorCode, LessonId, Timestamp, UserId};
use crate::ports::{
    ContentReader, PurchaseRepository, UserRepository, VerificationTokenRepository,
};

#[derive(Debug, Default)]
struct State {
    // A Vec rather than a map keyed by email: seeded data may hold several
    // accounts sharing one email.
    users: Vec<User>,
    contents: HashMap<ContentId, Content>,
    lessons: HashMap<LessonId, Lesson>,
    purchases: HashMap<(UserId, ContentId), Purchase>,
    tokens: HashMap<(String, String), VerificationToken>,
}

/// In-memory entitlement store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntitlementStore {
    state: Arc<RwLock<State>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryEntitlementStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `DatabaseError` (fault injection).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Add or replace content.
    pub async fn insert_content(&self, content: Content) {
        self.state.write().await.contents.insert(content.id, content);
    }

    /// Add or replace a lesson.
    pub async fn insert_lesson(&self, lesson: Lesson) {
        self.state.write().await.lessons.insert(lesson.id, lesson);
    }

    /// Add or replace the purchase for its (user, content) pair, in any status.
    pub async fn insert_purchase(&self, purchase: Purchase) {
        let key = (purchase.user_id.clone(), purchase.content_id);
        self.state.write().await.purchases.insert(key, purchase);
    }

    /// Insert a user without the email uniqueness check.
    ///
    /// Only for seeding data that predates the constraint.
    pub async fn seed_user(&self, user: User) {
        self.state.write().await.users.push(user);
    }

    /// All users with exactly this email.
    pub async fn users_with_email(&self, email: &str) -> Vec<User> {
        self.state
            .read()
            .await
            .users
            .iter()
            .filter(|u| u.email == email)
            .cloned()
            .collect()
    }

    /// Number of users stored
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Number of verification tokens stored
    pub async fn token_count(&self) -> usize {
        self.state.read().await.tokens.len()
    }

    /// Tokens issued for an email
    pub async fn tokens_for(&self, email: &str) -> Vec<VerificationToken> {
        self.state
            .read()
            .await
            .tokens
            .values()
            .filter(|t| t.email == email)
            .cloned()
            .collect()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("entitlement store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryEntitlementStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: &User) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::new(ErrorCode::UserExists, "Email already registered"));
        }
        if state.users.iter().any(|u| u.id == user.id) {
            return Err(DomainError::new(ErrorCode::UserExists, "User id already exists"));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn set_subscription_status_by_email(
        &self,
        email: &str,
        status: SubscriptionStatus,
        name: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<u64, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let now = Timestamp::now();
        let mut changed = 0;
        for user in state.users.iter_mut().filter(|u| u.email == email) {
            user.subscription_status = status;
            if let Some(name) = name {
                user.name = Some(name.to_string());
            }
            if let Some(subscription_id) = subscription_id {
                user.subscription_id = Some(subscription_id.to_string());
            }
            user.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn set_subscription_status(
        &self,
        id: &UserId,
        status: SubscriptionStatus,
    ) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;
        user.subscription_status = status;
        user.updated_at = Timestamp::now();
        Ok(())
    }

    async fn mark_email_verified(&self, email: &str, at: Timestamp) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let mut found = false;
        for user in state.users.iter_mut().filter(|u| u.email == email) {
            user.email_verified_at = Some(at);
            user.updated_at = at;
            found = true;
        }
        Ok(found)
    }
}

#[async_trait]
impl ContentReader for InMemoryEntitlementStore {
    async fn find_content(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        self.check_available()?;
        Ok(self.state.read().await.contents.get(id).cloned())
    }

    async fn find_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, DomainError> {
        self.check_available()?;
        Ok(self.state.read().await.lessons.get(id).cloned())
    }
}

#[async_trait]
impl PurchaseRepository for InMemoryEntitlementStore {
    async fn find(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
    ) -> Result<Option<Purchase>, DomainError> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .purchases
            .get(&(user_id.clone(), *content_id))
            .cloned())
    }

    async fn record_completed(&self, purchase: &Purchase) -> Result<Purchase, DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let key = (purchase.user_id.clone(), purchase.content_id);
        let stored = match state.purchases.get_mut(&key) {
            Some(existing) if existing.is_completed() => {
                return Err(DomainError::new(
                    ErrorCode::PurchaseExists,
                    "Purchase already exists for this user and content",
                ));
            }
            Some(existing) => {
                existing.status = PurchaseStatus::Completed;
                existing.amount = purchase.amount;
                existing.currency = purchase.currency.clone();
                existing.clone()
            }
            None => {
                let mut inserted = purchase.clone();
                inserted.status = PurchaseStatus::Completed;
                state.purchases.insert(key, inserted.clone());
                inserted
            }
        };
        Ok(stored)
    }
}

#[async_trait]
impl VerificationTokenRepository for InMemoryEntitlementStore {
    async fn save(&self, token: &VerificationToken) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let key = (token.email.clone(), token.token.as_str().to_string());
        if state.tokens.contains_key(&key) {
            return Err(DomainError::validation("token", "Token already issued"));
        }
        state.tokens.insert(key, token.clone());
        Ok(())
    }

    async fn consume(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<VerificationToken>, DomainError> {
        self.check_available()?;
        Ok(self
            .state
            .write()
            .await
            .tokens
            .remove(&(email.to_string(), token.to_string())))
    }
}
