use shared_types::{AppError, CachedRole, Role};
use std::sync::Arc;

use crate::clock::Clock;
use crate::ports::KeyValueStore;

/// Per-user, time-boxed role cache kept in the durable store.
///
/// Entries are never deleted. They are overwritten by newer resolutions or
/// ignored once older than the TTL. Every storage fault reads as a miss.
pub struct RoleCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
}

impl RoleCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, ttl: chrono::Duration) -> Self {
        Self { store, clock, ttl }
    }

    pub fn get(&self, user_id: &str) -> Option<CachedRole> {
        let raw = match self.store.get(&CachedRole::storage_key(user_id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Role cache read failed");
                return None;
            }
        };

        let entry: CachedRole = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(user_id, error = %e, "Ignoring corrupt role cache entry");
                return None;
            }
        };

        if entry.is_fresh_for(user_id, self.clock.now(), self.ttl) {
            Some(entry)
        } else {
            None
        }
    }

    pub fn put(&self, user_id: &str, role: Role) {
        let entry = CachedRole::new(user_id, role, self.clock.now());
        let result = serde_json::to_string(&entry)
            .map_err(AppError::from)
            .and_then(|json| self.store.set(&CachedRole::storage_key(user_id), &json));
        if let Err(e) = result {
            tracing::warn!(user_id, error = %e, "Role cache write failed");
        }
    }
}
