use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::clock::Clock;

/// Snapshot of the breaker's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitBreakerState {
    pub consecutive_failures: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub is_open: bool,
}

/// Consecutive-failure breaker over the role endpoint.
///
/// One instance is shared by every resolution pass. It opens after
/// `threshold` failures in a row and closes itself on the first `is_open`
/// check made more than `open_duration` after the last failure.
pub struct CircuitBreaker {
    inner: Mutex<CircuitBreakerState>,
    threshold: u32,
    open_duration: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, open_duration: chrono::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CircuitBreakerState::default()),
            threshold: threshold.max(1),
            open_duration,
            clock,
        }
    }

    pub fn is_open(&self) -> bool {
        let mut state = self.inner.lock();
        if !state.is_open {
            return false;
        }

        let cooled_down = state
            .last_failure_at
            .map(|at| self.clock.now() - at > self.open_duration)
            .unwrap_or(true);
        if cooled_down {
            *state = CircuitBreakerState::default();
            tracing::info!("Role lookup circuit breaker closed after cooldown");
            return false;
        }
        true
    }

    pub fn record_failure(&self) {
        let mut state = self.inner.lock();
        state.consecutive_failures += 1;
        state.last_failure_at = Some(self.clock.now());
        if !state.is_open && state.consecutive_failures >= self.threshold {
            state.is_open = true;
            tracing::info!(
                failures = state.consecutive_failures,
                "Role lookup circuit breaker opened"
            );
        }
    }

    pub fn record_success(&self) {
        let mut state = self.inner.lock();
        state.consecutive_failures = 0;
        state.is_open = false;
    }

    pub fn state(&self) -> CircuitBreakerState {
        self.inner.lock().clone()
    }
}
