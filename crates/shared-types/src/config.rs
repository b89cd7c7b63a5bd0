use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_cache_ttl_secs() -> u64 {
    120
}

fn default_breaker_threshold() -> u32 {
    3
}

fn default_breaker_open_secs() -> u64 {
    30
}

fn default_api_cooldown_secs() -> u64 {
    15
}

fn default_role_timeout_secs() -> u64 {
    5
}

fn default_redirect_cooldown_secs() -> u64 {
    5
}

fn default_subscription_max_retries() -> u32 {
    2
}

fn default_subscription_backoff_ms() -> u64 {
    1000
}

fn default_member_landing() -> String {
    "/dashboard".to_string()
}

fn default_instructor_landing() -> String {
    "/instructor".to_string()
}

fn default_admin_landing() -> String {
    "/admin".to_string()
}

fn default_roles_path() -> String {
    "/rest/v1/profiles?select=id,role".to_string()
}

fn default_cache_path() -> String {
    "access-cache.json".to_string()
}

/// Tuning knobs for role resolution, redirects and subscription lookup.
///
/// Loaded from the `[access]` table of `config.toml`. Every field carries a
/// serde default so a missing or partial table yields the stock timings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_breaker_threshold")]
    pub breaker_threshold: u32,
    #[serde(default = "default_breaker_open_secs")]
    pub breaker_open_secs: u64,
    #[serde(default = "default_api_cooldown_secs")]
    pub api_cooldown_secs: u64,
    #[serde(default = "default_role_timeout_secs")]
    pub role_timeout_secs: u64,
    #[serde(default = "default_redirect_cooldown_secs")]
    pub redirect_cooldown_secs: u64,
    #[serde(default = "default_subscription_max_retries")]
    pub subscription_max_retries: u32,
    #[serde(default = "default_subscription_backoff_ms")]
    pub subscription_backoff_ms: u64,
    /// Emails treated as admin when the role endpoint is unreachable.
    #[serde(default)]
    pub admin_emails: Vec<String>,
    #[serde(default = "default_member_landing")]
    pub member_landing: String,
    #[serde(default = "default_instructor_landing")]
    pub instructor_landing: String,
    #[serde(default = "default_admin_landing")]
    pub admin_landing: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            breaker_threshold: default_breaker_threshold(),
            breaker_open_secs: default_breaker_open_secs(),
            api_cooldown_secs: default_api_cooldown_secs(),
            role_timeout_secs: default_role_timeout_secs(),
            redirect_cooldown_secs: default_redirect_cooldown_secs(),
            subscription_max_retries: default_subscription_max_retries(),
            subscription_backoff_ms: default_subscription_backoff_ms(),
            admin_emails: Vec::new(),
            member_landing: default_member_landing(),
            instructor_landing: default_instructor_landing(),
            admin_landing: default_admin_landing(),
        }
    }
}

impl AccessConfig {
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs as i64)
    }

    pub fn breaker_open(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.breaker_open_secs as i64)
    }

    pub fn api_cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.api_cooldown_secs as i64)
    }

    pub fn redirect_cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.redirect_cooldown_secs as i64)
    }

    pub fn role_timeout(&self) -> Duration {
        Duration::from_secs(self.role_timeout_secs)
    }

    /// Delay before retry number `attempt` (1-based): linear in the attempt.
    pub fn subscription_backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.subscription_backoff_ms.saturating_mul(attempt as u64))
    }

    /// Case-insensitive membership in the fallback admin allow-list.
    pub fn is_allow_listed_admin(&self, email: &str) -> bool {
        let email = email.trim();
        !email.is_empty()
            && self
                .admin_emails
                .iter()
                .any(|allowed| allowed.trim().eq_ignore_ascii_case(email))
    }
}

/// Connection settings for the hosted platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_roles_path")]
    pub roles_path: String,
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            roles_path: default_roles_path(),
            cache_path: default_cache_path(),
        }
    }
}

impl PlatformConfig {
    /// Join a path onto the API base URL without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}
