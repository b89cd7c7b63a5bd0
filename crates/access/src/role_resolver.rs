use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared_types::{AccessConfig, AppError, Identity, Role};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::circuit_breaker::CircuitBreaker;
use crate::clock::Clock;
use crate::ports::RoleDirectory;
use crate::role_cache::RoleCache;

/// Where a resolved role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    Cache,
    Directory,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleResolution {
    pub role: Role,
    pub source: RoleSource,
}

impl RoleResolution {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_instructor(&self) -> bool {
        self.role.is_instructor()
    }
}

/// Cache first, then the role endpoint behind the breaker and a per-user
/// cooldown, then the email allow-list.
pub struct RoleResolver {
    cache: RoleCache,
    breaker: CircuitBreaker,
    directory: Arc<dyn RoleDirectory>,
    clock: Arc<dyn Clock>,
    config: AccessConfig,
    last_attempts: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl RoleResolver {
    pub fn new(
        cache: RoleCache,
        breaker: CircuitBreaker,
        directory: Arc<dyn RoleDirectory>,
        clock: Arc<dyn Clock>,
        config: AccessConfig,
    ) -> Self {
        Self {
            cache,
            breaker,
            directory,
            clock,
            config,
            last_attempts: Mutex::new(HashMap::new()),
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Resolve the role for `identity`. Only fails if `scope` is cancelled
    /// while the role endpoint is in flight.
    #[tracing::instrument(skip(self, identity, scope), fields(user_id = %identity.id))]
    pub async fn resolve(
        &self,
        identity: &Identity,
        scope: &CancellationToken,
    ) -> Result<RoleResolution, AppError> {
        if let Some(cached) = self.cache.get(&identity.id) {
            tracing::debug!(role = cached.role.as_str(), "Role cache hit");
            return Ok(RoleResolution {
                role: cached.role,
                source: RoleSource::Cache,
            });
        }

        if self.breaker.is_open() {
            tracing::debug!("Circuit breaker open, skipping role endpoint");
        } else if self.claim_attempt(&identity.id) {
            match self.lookup(&identity.id, scope).await {
                Ok(role) => {
                    self.breaker.record_success();
                    self.cache.put(&identity.id, role);
                    return Ok(RoleResolution {
                        role,
                        source: RoleSource::Directory,
                    });
                }
                Err(e) if e.kind == shared_types::AppErrorKind::Cancelled => return Err(e),
                Err(e) => {
                    self.breaker.record_failure();
                    tracing::warn!(error = %e, "Role lookup failed, using fallback");
                }
            }
        } else {
            tracing::debug!("Role endpoint cooling down for this user");
        }

        let role = self.fallback_role(&identity.email);
        self.cache.put(&identity.id, role);
        Ok(RoleResolution {
            role,
            source: RoleSource::Fallback,
        })
    }

    /// Stamp the attempt time if the cooldown since the previous one elapsed.
    fn claim_attempt(&self, user_id: &str) -> bool {
        let now = self.clock.now();
        let mut attempts = self.last_attempts.lock();
        if let Some(last) = attempts.get(user_id) {
            if now - *last < self.config.api_cooldown() {
                return false;
            }
        }
        attempts.insert(user_id.to_string(), now);
        true
    }

    async fn lookup(&self, user_id: &str, scope: &CancellationToken) -> Result<Role, AppError> {
        let timeout = self.config.role_timeout();
        let records = tokio::select! {
            _ = scope.cancelled() => {
                return Err(AppError::cancelled("Resolution scope dropped during role lookup"));
            }
            outcome = tokio::time::timeout(timeout, self.directory.fetch_roles()) => match outcome {
                Ok(records) => records?,
                Err(_) => {
                    return Err(AppError::timeout(format!(
                        "Role lookup exceeded {}s",
                        timeout.as_secs()
                    )))
                }
            },
        };

        Ok(records
            .iter()
            .find(|r| r.id == user_id)
            .map(|r| r.role())
            .unwrap_or_default())
    }

    fn fallback_role(&self, email: &str) -> Role {
        if self.config.is_allow_listed_admin(email) {
            Role::Admin
        } else {
            Role::Member
        }
    }
}
