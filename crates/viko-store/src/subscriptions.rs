use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

use viko_types::models::PushSubscriptionRecord;

use crate::{Store, StoreError};

impl Store {
    /// Idempotent upsert keyed by (`user_id`, `endpoint`). Re-subscribing
    /// from the same browser refreshes the keys in place.
    pub async fn upsert_subscription(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> Result<(), StoreError> {
        let resp = self
            .table(Method::POST, "push_subscriptions")
            .header("Prefer", "resolution=merge-duplicates")
            .query(&[("on_conflict", "user_id,endpoint")])
            .json(&json!({
                "user_id": user_id,
                "endpoint": endpoint,
                "p256dh": p256dh,
                "auth": auth,
            }))
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }

    pub async fn remove_subscription(&self, user_id: Uuid, endpoint: &str) -> Result<(), StoreError> {
        let resp = self
            .table(Method::DELETE, "push_subscriptions")
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("endpoint", format!("eq.{endpoint}")),
            ])
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }

    pub async fn list_subscriptions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PushSubscriptionRecord>, StoreError> {
        let resp = self
            .table(Method::GET, "push_subscriptions")
            .query(&[("user_id", format!("eq.{user_id}"))])
            .send()
            .await?;

        Ok(Self::check(resp).await?.json().await?)
    }

    /// Targeted delete used when a delivery attempt reports the endpoint
    /// permanently gone.
    pub async fn delete_subscription_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let resp = self
            .table(Method::DELETE, "push_subscriptions")
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }
}
