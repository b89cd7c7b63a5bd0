//! Adapters for the hosted backend: auth, the role endpoint and the
//! subscriptions table, all over its REST interface.

mod identity;
mod roles;
mod subscriptions;

use reqwest::RequestBuilder;
use shared_types::{AppError, PlatformConfig};
use std::sync::Arc;
use std::time::Duration;

use crate::ports::KeyValueStore;

/// Durable-store key holding the signed-in user's access token.
pub const SESSION_TOKEN_KEY: &str = "session_token";

/// Thin REST client for the hosted platform.
///
/// Implements [`IdentityProvider`](crate::ports::IdentityProvider),
/// [`RoleDirectory`](crate::ports::RoleDirectory) and
/// [`SubscriptionStore`](crate::ports::SubscriptionStore). Requests carry
/// the project key plus the persisted session token when there is one.
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    config: PlatformConfig,
    session: Arc<dyn KeyValueStore>,
}

impl PlatformClient {
    pub fn new(config: PlatformConfig, session: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        if config.api_url.is_empty() {
            return Err(AppError::internal("PLATFORM_URL is not configured"));
        }
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            config,
            session,
        })
    }

    /// Access token from the persisted session. Storage faults read as
    /// signed out.
    fn session_token(&self) -> Option<String> {
        match self.session.get(SESSION_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Session store read failed");
                None
            }
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let bearer = self
            .session_token()
            .unwrap_or_else(|| self.config.api_key.clone());
        self.http
            .get(self.config.endpoint(path))
            .header("apikey", &self.config.api_key)
            .bearer_auth(bearer)
    }
}
