use shared_types::{AccessConfig, AccessState, Identity, Role, SUBSCRIPTION_CHECK_FAILED};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::circuit_breaker::CircuitBreaker;
use crate::clock::Clock;
use crate::ports::{IdentityProvider, KeyValueStore, Navigator, RoleDirectory, SubscriptionStore};
use crate::redirect_guard::RedirectGuard;
use crate::role_cache::RoleCache;
use crate::role_resolver::{RoleResolution, RoleResolver};
use crate::subscription_resolver::SubscriptionResolver;

/// Everything the coordinator needs from the outside world.
pub struct Collaborators {
    pub identity: Arc<dyn IdentityProvider>,
    pub roles: Arc<dyn RoleDirectory>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
}

/// One per application. Owns the breaker, the redirect guard and the
/// per-user lookup cooldowns shared by every view that asks "who is this
/// and what may they see".
pub struct AccessCoordinator {
    identity: Arc<dyn IdentityProvider>,
    roles: RoleResolver,
    subscriptions: SubscriptionResolver,
    guard: RedirectGuard,
    config: AccessConfig,
}

impl AccessCoordinator {
    pub fn new(config: AccessConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            identity,
            roles,
            subscriptions,
            store,
            clock,
        } = collaborators;

        let cache = RoleCache::new(store.clone(), clock.clone(), config.cache_ttl());
        let breaker = CircuitBreaker::new(
            config.breaker_threshold,
            config.breaker_open(),
            clock.clone(),
        );

        Self {
            identity,
            roles: RoleResolver::new(cache, breaker, roles, clock.clone(), config.clone()),
            subscriptions: SubscriptionResolver::new(subscriptions, store, clock.clone(), config.clone()),
            guard: RedirectGuard::new(config.redirect_cooldown(), clock),
            config,
        }
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    pub fn guard(&self) -> &RedirectGuard {
        &self.guard
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        self.roles.breaker()
    }

    /// Run one resolution pass: session, role, redirect, subscription.
    ///
    /// Returns `None` when `scope` was cancelled before the pass finished;
    /// the caller must not apply anything in that case. No redirect is issued
    /// from a cancelled scope.
    #[tracing::instrument(skip_all)]
    pub async fn resolve(
        &self,
        scope: &CancellationToken,
        navigator: &dyn Navigator,
    ) -> Option<AccessState> {
        if scope.is_cancelled() {
            return None;
        }

        let identity = match self.identity.current_user().await {
            Ok(Some(identity)) => identity,
            Ok(None) => return live(scope, AccessState::signed_out()),
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed");
                return live(scope, AccessState::failed(SUBSCRIPTION_CHECK_FAILED));
            }
        };

        let resolution = self.roles.resolve(&identity, scope).await.ok()?;
        if scope.is_cancelled() {
            return None;
        }

        self.apply_redirect(&identity, &resolution, navigator);

        let outcome = self
            .subscriptions
            .resolve(
                &identity.id,
                resolution.is_admin(),
                resolution.is_instructor(),
                scope,
            )
            .await
            .ok()?;

        live(
            scope,
            AccessState {
                subscription: outcome.subscription,
                is_admin: resolution.is_admin(),
                is_instructor: resolution.is_instructor(),
                loading: false,
                error: outcome.error,
            },
        )
    }

    /// Leave the member dashboard for a staff landing page, once per user.
    fn apply_redirect(&self, identity: &Identity, resolution: &RoleResolution, navigator: &dyn Navigator) {
        if self.guard.is_processed(&identity.id) {
            return;
        }

        let current = navigator.current_path();
        let target = resolution.role.landing_path(&self.config);
        let on_member_dashboard = current == self.config.member_landing;

        if on_member_dashboard && target != current {
            let reason = match resolution.role {
                Role::Admin => "admin role detected",
                Role::Instructor => "instructor role detected",
                Role::Member => "member role detected",
            };
            self.guard.try_redirect(navigator, target, reason, &identity.id);
        } else {
            self.guard.mark_processed(&identity.id);
        }
    }
}

fn live(scope: &CancellationToken, state: AccessState) -> Option<AccessState> {
    (!scope.is_cancelled()).then_some(state)
}
