use serde::{Deserialize, Serialize};

use crate::{EffectiveSubscription, Role};

/// Message shown when the subscription (or the session behind it) could not be resolved.
pub const SUBSCRIPTION_CHECK_FAILED: &str = "Failed to check subscription";

/// What the rest of the UI sees after a resolution pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessState {
    pub subscription: Option<EffectiveSubscription>,
    pub is_admin: bool,
    pub is_instructor: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl AccessState {
    /// Initial state while a pass is in flight.
    pub fn loading() -> Self {
        Self {
            subscription: None,
            is_admin: false,
            is_instructor: false,
            loading: true,
            error: None,
        }
    }

    /// No authenticated identity.
    pub fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::loading()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::signed_out()
        }
    }

    pub fn role(&self) -> Role {
        Role::from_flags(self.is_admin, self.is_instructor)
    }

    pub fn has_active_subscription(&self) -> bool {
        self.subscription
            .as_ref()
            .map(|s| s.record().is_active())
            .unwrap_or(false)
    }
}

impl Default for AccessState {
    fn default() -> Self {
        Self::loading()
    }
}
