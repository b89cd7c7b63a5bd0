use shared_types::{
    AccessConfig, AppError, EffectiveSubscription, Role, Subscription, SubscriptionQuery,
    SubscriptionSnapshot, SUBSCRIPTION_CHECK_FAILED, SUBSCRIPTION_SNAPSHOT_KEY,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::ports::{KeyValueStore, SubscriptionStore};

/// Result of a subscription pass. `error` is set only when neither the live
/// lookup nor the snapshot produced an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionOutcome {
    pub subscription: Option<EffectiveSubscription>,
    pub error: Option<String>,
}

/// Turns a resolved role into the subscription the UI gates on.
pub struct SubscriptionResolver {
    store: Arc<dyn SubscriptionStore>,
    snapshots: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: AccessConfig,
}

impl SubscriptionResolver {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        snapshots: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: AccessConfig,
    ) -> Self {
        Self {
            store,
            snapshots,
            clock,
            config,
        }
    }

    /// Staff get their synthetic subscription immediately. Members hit the
    /// store with linear-backoff retries, then the snapshot.
    ///
    /// Fails only with a `Cancelled` error when `scope` is dropped mid-pass.
    #[tracing::instrument(skip(self, scope))]
    pub async fn resolve(
        &self,
        user_id: &str,
        is_admin: bool,
        is_instructor: bool,
        scope: &CancellationToken,
    ) -> Result<SubscriptionOutcome, AppError> {
        let role = Role::from_flags(is_admin, is_instructor);
        if role != Role::Member {
            return Ok(SubscriptionOutcome {
                subscription: EffectiveSubscription::synthetic_for(role),
                error: None,
            });
        }

        let query = SubscriptionQuery::active_for(user_id);
        let max_retries = self.config.subscription_max_retries;
        let mut attempt = 0;
        loop {
            if scope.is_cancelled() {
                return Err(AppError::cancelled("Resolution scope dropped during subscription lookup"));
            }

            match self.store.find_subscription(&query).await {
                Ok(row) => {
                    self.save_snapshot(user_id, row.as_ref());
                    return Ok(SubscriptionOutcome {
                        subscription: row.map(EffectiveSubscription::Live),
                        error: None,
                    });
                }
                Err(e) if attempt < max_retries => {
                    attempt += 1;
                    let delay = self.config.subscription_backoff(attempt);
                    tracing::warn!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "Subscription lookup failed, retrying");
                    tokio::select! {
                        _ = scope.cancelled() => {
                            return Err(AppError::cancelled("Resolution scope dropped during subscription backoff"));
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Subscription lookup exhausted retries");
                    break;
                }
            }
        }

        match self.load_snapshot(user_id) {
            Some(snapshot) => {
                tracing::warn!("Serving subscription from local snapshot");
                Ok(SubscriptionOutcome {
                    subscription: snapshot.subscription.map(EffectiveSubscription::Live),
                    error: None,
                })
            }
            None => Ok(SubscriptionOutcome {
                subscription: None,
                error: Some(SUBSCRIPTION_CHECK_FAILED.to_string()),
            }),
        }
    }

    fn save_snapshot(&self, user_id: &str, subscription: Option<&Subscription>) {
        let snapshot = SubscriptionSnapshot {
            member_id: user_id.to_string(),
            subscription: subscription.cloned(),
            saved_at: self.clock.now(),
        };
        let result = serde_json::to_string(&snapshot)
            .map_err(AppError::from)
            .and_then(|json| self.snapshots.set(SUBSCRIPTION_SNAPSHOT_KEY, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Subscription snapshot write failed");
        }
    }

    fn load_snapshot(&self, user_id: &str) -> Option<SubscriptionSnapshot> {
        let raw = self.snapshots.get(SUBSCRIPTION_SNAPSHOT_KEY).ok().flatten()?;
        let snapshot: SubscriptionSnapshot = serde_json::from_str(&raw).ok()?;
        (snapshot.member_id == user_id).then_some(snapshot)
    }
}
