use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccessConfig;

/// Academy role controlling which dashboard a user lands on.
///
/// - `Member`: books classes and tracks progress.
/// - `Instructor`: runs classes and sees their rosters.
/// - `Admin`: full access (superset of all roles).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Instructor,
    Admin,
}

impl Role {
    /// Parse a role string from the role endpoint. Unknown values default to Member.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "instructor" => Role::Instructor,
            _ => Role::Member,
        }
    }

    /// Lowercase string for storage and synthetic plan names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    /// Returns true if this role satisfies the `required` role.
    /// Admin satisfies all roles, Instructor satisfies itself and Member.
    pub fn satisfies(&self, required: &Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Instructor => matches!(required, Role::Instructor | Role::Member),
            Role::Member => matches!(required, Role::Member),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_instructor(&self) -> bool {
        matches!(self, Role::Instructor)
    }

    /// Dashboard path this role lands on.
    pub fn landing_path<'a>(&self, config: &'a AccessConfig) -> &'a str {
        match self {
            Role::Member => &config.member_landing,
            Role::Instructor => &config.instructor_landing,
            Role::Admin => &config.admin_landing,
        }
    }

    /// Derive a role from the `(is_admin, is_instructor)` pair exposed to the UI.
    pub fn from_flags(is_admin: bool, is_instructor: bool) -> Self {
        if is_admin {
            Role::Admin
        } else if is_instructor {
            Role::Instructor
        } else {
            Role::Member
        }
    }
}

/// The authenticated identity supplied by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// One row returned by the role endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleRecord {
    pub id: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl RoleRecord {
    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .map(Role::from_str_or_default)
            .unwrap_or_default()
    }
}

/// A resolved role persisted in the durable store under `role_<user_id>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedRole {
    pub role: Role,
    pub resolved_at: DateTime<Utc>,
    pub user_id: String,
}

impl CachedRole {
    pub fn new(user_id: impl Into<String>, role: Role, resolved_at: DateTime<Utc>) -> Self {
        Self {
            role,
            resolved_at,
            user_id: user_id.into(),
        }
    }

    /// Storage key for a user's cached role.
    pub fn storage_key(user_id: &str) -> String {
        format!("role_{user_id}")
    }

    /// Valid only for the same user and strictly younger than `ttl`.
    pub fn is_fresh_for(&self, user_id: &str, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        self.user_id == user_id && now - self.resolved_at < ttl
    }
}
