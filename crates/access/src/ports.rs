//! Collaborators the access core depends on but does not own.
//!
//! The surrounding application supplies implementations: the hosted platform
//! adapters in [`crate::platform`], the durable stores in [`crate::kv`], and
//! the router-backed navigator in the UI crate.

use async_trait::async_trait;
use shared_types::{AppError, Identity, RoleRecord, Subscription, SubscriptionQuery};

/// Who is signed in right now.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when nobody is signed in.
    async fn current_user(&self) -> Result<Option<Identity>, AppError>;
}

/// The slow, unreliable role endpoint. Returns every `{id, role}` row it
/// knows about; callers filter for the user they care about.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn fetch_roles(&self) -> Result<Vec<RoleRecord>, AppError>;
}

/// The subscriptions table.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn find_subscription(
        &self,
        query: &SubscriptionQuery,
    ) -> Result<Option<Subscription>, AppError>;
}

/// Durable string key-value storage scoped to one device profile.
///
/// Advisory only: callers treat every error as a miss.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Location of the requesting view and the means to leave it.
pub trait Navigator {
    fn current_path(&self) -> String;
    /// Navigate without adding a history entry.
    fn replace(&self, path: &str);
}
