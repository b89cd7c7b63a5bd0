use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use shared_types::{AppError, Identity};

use super::PlatformClient;
use crate::error_convert::ReqwestErrorExt;
use crate::ports::IdentityProvider;

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[async_trait]
impl IdentityProvider for PlatformClient {
    #[tracing::instrument(skip(self))]
    async fn current_user(&self) -> Result<Option<Identity>, AppError> {
        if self.session_token().is_none() {
            return Ok(None);
        }

        let response = self
            .get("/auth/v1/user")
            .send()
            .await
            .map_err(|e| e.into_app_error())?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("Session token rejected, treating as signed out");
            return Ok(None);
        }

        let user: AuthUser = response
            .error_for_status()
            .map_err(|e| e.into_app_error())?
            .json()
            .await
            .map_err(|e| e.into_app_error())?;

        Ok(Some(Identity {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }))
    }
}
