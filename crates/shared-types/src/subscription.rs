use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Role;

/// Expiry stamped on synthetic staff subscriptions.
pub const SYNTHETIC_END_DATE: &str = "2099-12-31T23:59:59Z";

/// Storage key of the best-effort subscription snapshot.
pub const SUBSCRIPTION_SNAPSHOT_KEY: &str = "subscription";

/// A subscription row as stored by the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    pub end_date: String,
    pub plan_type: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// The access-level record used to gate features.
///
/// Staff get a synthetic record without touching the subscriptions table;
/// members get whatever live row the platform returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", content = "record", rename_all = "lowercase")]
pub enum EffectiveSubscription {
    Synthetic(Subscription),
    Live(Subscription),
}

impl EffectiveSubscription {
    /// Synthetic subscription for staff roles. Members have none.
    pub fn synthetic_for(role: Role) -> Option<Self> {
        match role {
            Role::Admin | Role::Instructor => Some(EffectiveSubscription::Synthetic(Subscription {
                id: format!("{}-subscription", role.as_str()),
                status: "active".to_string(),
                end_date: SYNTHETIC_END_DATE.to_string(),
                plan_type: role.as_str().to_string(),
                price: 0.0,
                payment_method: None,
            })),
            Role::Member => None,
        }
    }

    pub fn record(&self) -> &Subscription {
        match self {
            EffectiveSubscription::Synthetic(s) | EffectiveSubscription::Live(s) => s,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, EffectiveSubscription::Synthetic(_))
    }
}

/// Query for a member's current subscription: equality on member and status,
/// newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionQuery {
    pub member_id: String,
    pub status: String,
    pub order_by: String,
    pub descending: bool,
    pub limit: u32,
}

impl SubscriptionQuery {
    pub fn active_for(member_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            status: "active".to_string(),
            order_by: "created_at".to_string(),
            descending: true,
            limit: 1,
        }
    }
}

/// Last successful live lookup, kept as a fallback for when the platform is down.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionSnapshot {
    pub member_id: String,
    pub subscription: Option<Subscription>,
    pub saved_at: DateTime<Utc>,
}
