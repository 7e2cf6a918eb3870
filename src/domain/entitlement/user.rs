//! User account as seen by the entitlement engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

/// Club subscription state of a user.
///
/// Only `Active` unlocks club content. Values are set absolutely by payment
/// webhooks or by an administrator, never derived incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Canceled,
    PastDue,
}

impl SubscriptionStatus {
    /// Returns true if this status grants club access.
    pub fn grants_club_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Inactive => "INACTIVE",
            SubscriptionStatus::Canceled => "CANCELED",
            SubscriptionStatus::PastDue => "PAST_DUE",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(SubscriptionStatus::Active),
            "INACTIVE" => Ok(SubscriptionStatus::Inactive),
            "CANCELED" => Ok(SubscriptionStatus::Canceled),
            "PAST_DUE" => Ok(SubscriptionStatus::PastDue),
            other => Err(ValidationError::invalid_format(
                "subscription_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// A platform account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Unique, compared exactly as stored.
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub subscription_status: SubscriptionStatus,
    /// Subscription reference from the payment provider, if any.
    pub subscription_id: Option<String>,
    pub email_verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// A self-registered account. No club access until a `paid` event.
    pub fn register(email: impl Into<String>, name: Option<String>, password_hash: String) -> Self {
        let now = Timestamp::now();
        Self {
            id: UserId::generate(),
            email: email.into(),
            name,
            password_hash,
            role: Role::User,
            subscription_status: SubscriptionStatus::Inactive,
            subscription_id: None,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// An account created on the first successful payment for an unknown email.
    pub fn provision_from_payment(
        email: impl Into<String>,
        name: Option<String>,
        password_hash: String,
        subscription_id: Option<String>,
    ) -> Self {
        let mut user = Self::register(email, name, password_hash);
        user.subscription_status = SubscriptionStatus::Active;
        user.subscription_id = subscription_id;
        user
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
