mod repo;
mod sender;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use viko_types::api::PushPayload;
use viko_types::models::PushSubscriptionRecord;

pub use sender::VapidSender;

/// Outcome of one delivery attempt to one endpoint.
#[derive(Debug, Error)]
pub enum PushDeliveryError {
    /// The push service reported the endpoint permanently gone (404/410).
    /// The subscription record must be deleted.
    #[error("endpoint permanently gone")]
    Gone,

    #[error("push delivery failed: {0}")]
    Failed(String),
}

/// Storage for push subscriptions. The notifier is the only writer and
/// deleter of these records after creation.
#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn upsert(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> anyhow::Result<()>;

    async fn remove(&self, user_id: Uuid, endpoint: &str) -> anyhow::Result<()>;

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<PushSubscriptionRecord>>;

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()>;
}

/// Wire-level delivery to a single endpoint. Separated from the fan-out so
/// the pruning policy is testable without a push service.
#[async_trait]
pub trait WirePush: Send + Sync {
    async fn deliver(
        &self,
        subscription: &PushSubscriptionRecord,
        payload: &str,
    ) -> Result<(), PushDeliveryError>;
}

/// Fans a notification payload out to every endpoint a user registered,
/// pruning endpoints the push service reports as gone.
pub struct Notifier {
    repo: Arc<dyn SubscriptionRepo>,
    wire: Arc<dyn WirePush>,
}

impl Notifier {
    pub fn new(repo: Arc<dyn SubscriptionRepo>, wire: Arc<dyn WirePush>) -> Self {
        Self { repo, wire }
    }

    /// Idempotent subscription upsert keyed by (user, endpoint).
    pub async fn save_subscription(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> anyhow::Result<()> {
        self.repo.upsert(user_id, endpoint, p256dh, auth).await
    }

    pub async fn remove_subscription(&self, user_id: Uuid, endpoint: &str) -> anyhow::Result<()> {
        self.repo.remove(user_id, endpoint).await
    }

    /// Deliver `payload` to every endpoint the user registered.
    ///
    /// Deliveries run concurrently and independently; a failure on one
    /// endpoint never blocks the others. Endpoints reported gone are deleted.
    /// Delivery failures are never surfaced — when every endpoint fails, one
    /// aggregate warning is logged and the call still returns `Ok`.
    pub async fn send_to_user(&self, user_id: Uuid, payload: &PushPayload) -> anyhow::Result<()> {
        let subscriptions = self.repo.list_for_user(user_id).await?;
        if subscriptions.is_empty() {
            return Ok(());
        }

        let json = serde_json::to_string(payload)?;

        let outcomes = join_all(subscriptions.iter().map(|sub| {
            let json = json.as_str();
            async move {
                match self.wire.deliver(sub, json).await {
                    Ok(()) => true,
                    Err(PushDeliveryError::Gone) => {
                        info!(subscription = %sub.id, user = %user_id, "pruning gone push endpoint");
                        if let Err(err) = self.repo.delete_by_id(sub.id).await {
                            warn!(subscription = %sub.id, "failed to prune subscription: {err:#}");
                        }
                        false
                    }
                    Err(PushDeliveryError::Failed(reason)) => {
                        debug!(subscription = %sub.id, "push delivery failed: {reason}");
                        false
                    }
                }
            }
        }))
        .await;

        if outcomes.iter().all(|delivered| !delivered) {
            warn!(user = %user_id, "all push notifications failed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn record(user_id: Uuid, endpoint: &str) -> PushSubscriptionRecord {
        PushSubscriptionRecord {
            id: Uuid::new_v4(),
            user_id,
            endpoint: endpoint.to_string(),
            p256dh: "p256dh-key".into(),
            auth: "auth-secret".into(),
        }
    }

    #[derive(Default)]
    struct MemoryRepo {
        subscriptions: Mutex<Vec<PushSubscriptionRecord>>,
        deleted: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl SubscriptionRepo for MemoryRepo {
        async fn upsert(
            &self,
            user_id: Uuid,
            endpoint: &str,
            p256dh: &str,
            auth: &str,
        ) -> anyhow::Result<()> {
            let mut subs = self.subscriptions.lock().unwrap();
            if let Some(existing) = subs
                .iter_mut()
                .find(|s| s.user_id == user_id && s.endpoint == endpoint)
            {
                existing.p256dh = p256dh.to_string();
                existing.auth = auth.to_string();
            } else {
                let mut sub = record(user_id, endpoint);
                sub.p256dh = p256dh.to_string();
                sub.auth = auth.to_string();
                subs.push(sub);
            }
            Ok(())
        }

        async fn remove(&self, user_id: Uuid, endpoint: &str) -> anyhow::Result<()> {
            self.subscriptions
                .lock()
                .unwrap()
                .retain(|s| !(s.user_id == user_id && s.endpoint == endpoint));
            Ok(())
        }

        async fn list_for_user(
            &self,
            user_id: Uuid,
        ) -> anyhow::Result<Vec<PushSubscriptionRecord>> {
            Ok(self
                .subscriptions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()> {
            self.subscriptions.lock().unwrap().retain(|s| s.id != id);
            self.deleted.lock().unwrap().push(id);
            Ok(())
        }
    }

    /// Wire fake that fails endpoints by substring match.
    struct ScriptedWire {
        gone: &'static str,
        failing: &'static str,
        delivered: Mutex<Vec<String>>,
    }

    impl ScriptedWire {
        fn new(gone: &'static str, failing: &'static str) -> Self {
            Self {
                gone,
                failing,
                delivered: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl WirePush for ScriptedWire {
        async fn deliver(
            &self,
            subscription: &PushSubscriptionRecord,
            _payload: &str,
        ) -> Result<(), PushDeliveryError> {
            if !self.gone.is_empty() && subscription.endpoint.contains(self.gone) {
                return Err(PushDeliveryError::Gone);
            }
            if !self.failing.is_empty() && subscription.endpoint.contains(self.failing) {
                return Err(PushDeliveryError::Failed("503 from push service".into()));
            }
            self.delivered
                .lock()
                .unwrap()
                .push(subscription.endpoint.clone());
            Ok(())
        }
    }

    fn payload() -> PushPayload {
        PushPayload {
            title: "Minho".into(),
            body: "안녕하세요".into(),
            url: Some("/chat/abc".into()),
        }
    }

    #[tokio::test]
    async fn gone_endpoint_is_pruned_and_others_survive() {
        let user = Uuid::new_v4();
        let repo = Arc::new(MemoryRepo::default());
        {
            let mut subs = repo.subscriptions.lock().unwrap();
            subs.push(record(user, "https://push.example/alive-1"));
            subs.push(record(user, "https://push.example/stale"));
            subs.push(record(user, "https://push.example/alive-2"));
        }
        let wire = Arc::new(ScriptedWire::new("stale", ""));

        let notifier = Notifier::new(repo.clone(), wire.clone());
        notifier.send_to_user(user, &payload()).await.unwrap();

        let deleted = repo.deleted.lock().unwrap().clone();
        assert_eq!(deleted.len(), 1);

        let remaining = repo.list_for_user(user).await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|s| !s.endpoint.contains("stale")));

        let delivered = wire.delivered.lock().unwrap().clone();
        assert_eq!(delivered.len(), 2);
    }

    #[tokio::test]
    async fn all_failing_endpoints_do_not_raise() {
        let user = Uuid::new_v4();
        let repo = Arc::new(MemoryRepo::default());
        {
            let mut subs = repo.subscriptions.lock().unwrap();
            subs.push(record(user, "https://push.example/down-1"));
            subs.push(record(user, "https://push.example/down-2"));
        }
        let wire = Arc::new(ScriptedWire::new("", "down"));

        let notifier = Notifier::new(repo.clone(), wire);
        notifier.send_to_user(user, &payload()).await.unwrap();

        // Non-gone failures are swallowed without touching the records.
        assert!(repo.deleted.lock().unwrap().is_empty());
        assert_eq!(repo.list_for_user(user).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn no_subscriptions_is_a_quiet_noop() {
        let repo = Arc::new(MemoryRepo::default());
        let wire = Arc::new(ScriptedWire::new("", ""));
        let notifier = Notifier::new(repo, wire.clone());

        notifier.send_to_user(Uuid::new_v4(), &payload()).await.unwrap();
        assert!(wire.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_subscription_upserts_by_user_and_endpoint() {
        let user = Uuid::new_v4();
        let repo = Arc::new(MemoryRepo::default());
        let notifier = Notifier::new(repo.clone(), Arc::new(ScriptedWire::new("", "")));

        notifier
            .save_subscription(user, "https://push.example/a", "key-1", "auth-1")
            .await
            .unwrap();
        notifier
            .save_subscription(user, "https://push.example/a", "key-2", "auth-2")
            .await
            .unwrap();

        let subs = repo.list_for_user(user).await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].p256dh, "key-2");

        notifier
            .remove_subscription(user, "https://push.example/a")
            .await
            .unwrap();
        assert!(repo.list_for_user(user).await.unwrap().is_empty());
    }
}
