use async_trait::async_trait;
use uuid::Uuid;

use viko_store::Store;
use viko_types::models::PushSubscriptionRecord;

use crate::SubscriptionRepo;

#[async_trait]
impl SubscriptionRepo for Store {
    async fn upsert(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> anyhow::Result<()> {
        Ok(self.upsert_subscription(user_id, endpoint, p256dh, auth).await?)
    }

    async fn remove(&self, user_id: Uuid, endpoint: &str) -> anyhow::Result<()> {
        Ok(self.remove_subscription(user_id, endpoint).await?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<PushSubscriptionRecord>> {
        Ok(self.list_subscriptions(user_id).await?)
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()> {
        Ok(self.delete_subscription_by_id(id).await?)
    }
}
