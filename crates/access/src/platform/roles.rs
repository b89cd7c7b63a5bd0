use async_trait::async_trait;
use shared_types::{AppError, RoleRecord};

use super::PlatformClient;
use crate::error_convert::ReqwestErrorExt;
use crate::ports::RoleDirectory;

#[async_trait]
impl RoleDirectory for PlatformClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_roles(&self) -> Result<Vec<RoleRecord>, AppError> {
        let records: Vec<RoleRecord> = self
            .get(&self.config.roles_path)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.into_app_error())?
            .json()
            .await
            .map_err(|e| e.into_app_error())?;

        tracing::debug!(count = records.len(), "Fetched role records");
        Ok(records)
    }
}
