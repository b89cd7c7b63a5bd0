use async_trait::async_trait;
use shared_types::{AppError, Subscription, SubscriptionQuery};

use super::PlatformClient;
use crate::error_convert::ReqwestErrorExt;
use crate::ports::SubscriptionStore;

const SUBSCRIPTIONS_PATH: &str = "/rest/v1/subscriptions";
const SUBSCRIPTION_COLUMNS: &str = "id,status,end_date,plan_type,price,payment_method";

/// PostgREST filter parameters for a subscription query.
pub(crate) fn query_params(query: &SubscriptionQuery) -> Vec<(&'static str, String)> {
    let direction = if query.descending { "desc" } else { "asc" };
    vec![
        ("select", SUBSCRIPTION_COLUMNS.to_string()),
        ("member_id", format!("eq.{}", query.member_id)),
        ("status", format!("eq.{}", query.status)),
        ("order", format!("{}.{}", query.order_by, direction)),
        ("limit", query.limit.to_string()),
    ]
}

#[async_trait]
impl SubscriptionStore for PlatformClient {
    #[tracing::instrument(skip(self))]
    async fn find_subscription(
        &self,
        query: &SubscriptionQuery,
    ) -> Result<Option<Subscription>, AppError> {
        let rows: Vec<Subscription> = self
            .get(SUBSCRIPTIONS_PATH)
            .query(&query_params(query))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.into_app_error())?
            .json()
            .await
            .map_err(|e| e.into_app_error())?;

        Ok(rows.into_iter().next())
    }
}
