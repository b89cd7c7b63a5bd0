//! Role resolution, redirect guarding and subscription lookup for the
//! academy dashboards.
//!
//! [`AccessCoordinator`] is the composition root: build one per application
//! and share it between every view that needs `{ subscription, is_admin,
//! is_instructor, loading, error }`.

pub mod circuit_breaker;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod kv;
pub mod ports;
pub mod redirect_guard;
pub mod role_cache;
pub mod role_resolver;
pub mod subscription_resolver;
pub mod telemetry;

#[cfg(feature = "platform")]
pub mod error_convert;

#[cfg(feature = "platform")]
pub mod platform;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerState};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{AccessCoordinator, Collaborators};
pub use kv::{FileStore, MemoryStore};
pub use ports::{IdentityProvider, KeyValueStore, Navigator, RoleDirectory, SubscriptionStore};
pub use redirect_guard::{RedirectDenial, RedirectGuard, RedirectGuardState};
pub use role_cache::RoleCache;
pub use role_resolver::{RoleResolution, RoleResolver, RoleSource};
pub use subscription_resolver::{SubscriptionOutcome, SubscriptionResolver};

pub use tokio_util::sync::CancellationToken;
