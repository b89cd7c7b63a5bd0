use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::clock::Clock;
use crate::ports::Navigator;

/// Snapshot of the guard's process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectGuardState {
    pub is_redirecting: bool,
    pub last_redirect_at: Option<DateTime<Utc>>,
    pub processed_user_ids: HashSet<String>,
}

/// Why a redirect request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectDenial {
    InFlight,
    AlreadyProcessed,
    CoolingDown,
    AlreadyThere,
}

/// Keeps role-driven redirects idempotent across remounts.
///
/// A user is redirected at most once per process lifetime, only one redirect
/// may be in flight, and any two redirects are at least `cooldown` apart.
pub struct RedirectGuard {
    inner: Mutex<RedirectGuardState>,
    cooldown: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl RedirectGuard {
    pub fn new(cooldown: chrono::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(RedirectGuardState::default()),
            cooldown,
            clock,
        }
    }

    /// Replace-navigate to `path` unless a gate denies it. Returns true if the
    /// navigation was executed.
    pub fn try_redirect(
        &self,
        navigator: &dyn Navigator,
        path: &str,
        reason: &str,
        user_id: &str,
    ) -> bool {
        match self.admit(navigator, path, user_id) {
            Ok(()) => {
                tracing::info!(user_id, path, reason, "Redirecting");
                navigator.replace(path);
                true
            }
            Err(denial) => {
                tracing::debug!(user_id, path, reason, ?denial, "Redirect denied");
                false
            }
        }
    }

    fn admit(&self, navigator: &dyn Navigator, path: &str, user_id: &str) -> Result<(), RedirectDenial> {
        let mut state = self.inner.lock();
        let now = self.clock.now();

        if state.is_redirecting {
            return Err(RedirectDenial::InFlight);
        }
        if state.processed_user_ids.contains(user_id) {
            return Err(RedirectDenial::AlreadyProcessed);
        }
        if let Some(last) = state.last_redirect_at {
            if now - last < self.cooldown {
                return Err(RedirectDenial::CoolingDown);
            }
        }
        if navigator.current_path() == path {
            return Err(RedirectDenial::AlreadyThere);
        }

        state.is_redirecting = true;
        state.last_redirect_at = Some(now);
        state.processed_user_ids.insert(user_id.to_string());
        Ok(())
    }

    /// Record that no redirect is needed for `user_id`. Returns false if the
    /// user had already been processed.
    pub fn mark_processed(&self, user_id: &str) -> bool {
        self.inner.lock().processed_user_ids.insert(user_id.to_string())
    }

    pub fn is_processed(&self, user_id: &str) -> bool {
        self.inner.lock().processed_user_ids.contains(user_id)
    }

    /// Clear the in-flight flag once an in-app navigation has landed.
    /// Processed users stay processed.
    pub fn settle(&self) {
        self.inner.lock().is_redirecting = false;
    }

    pub fn state(&self) -> RedirectGuardState {
        self.inner.lock().clone()
    }
}
