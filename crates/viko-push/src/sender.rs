use async_trait::async_trait;
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder, URL_SAFE_NO_PAD,
};

use viko_types::models::PushSubscriptionRecord;

use crate::{PushDeliveryError, WirePush};

/// Web Push delivery with VAPID sender attribution. The private key is the
/// URL-safe base64 form the application server generated at setup.
pub struct VapidSender {
    client: HyperWebPushClient,
    private_key: String,
    subject: String,
}

impl VapidSender {
    pub fn new(private_key: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            client: HyperWebPushClient::new(),
            private_key: private_key.into(),
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl WirePush for VapidSender {
    async fn deliver(
        &self,
        subscription: &PushSubscriptionRecord,
        payload: &str,
    ) -> Result<(), PushDeliveryError> {
        let info = SubscriptionInfo::new(
            &subscription.endpoint,
            &subscription.p256dh,
            &subscription.auth,
        );

        let signature = {
            let mut builder =
                VapidSignatureBuilder::from_base64(&self.private_key, URL_SAFE_NO_PAD, &info)
                    .map_err(|e| PushDeliveryError::Failed(format!("vapid key rejected: {e}")))?;
            builder.add_claim("sub", self.subject.as_str());
            builder
                .build()
                .map_err(|e| PushDeliveryError::Failed(format!("vapid signing failed: {e}")))?
        };

        let mut message = WebPushMessageBuilder::new(&info);
        message.set_payload(ContentEncoding::Aes128Gcm, payload.as_bytes());
        message.set_vapid_signature(signature);

        let message = message
            .build()
            .map_err(|e| PushDeliveryError::Failed(format!("message build failed: {e}")))?;

        match self.client.send(message).await {
            Ok(()) => Ok(()),
            // 410 Gone / 404 Not Found: the browser dropped the subscription.
            Err(WebPushError::EndpointNotValid) | Err(WebPushError::EndpointNotFound) => {
                Err(PushDeliveryError::Gone)
            }
            Err(e) => Err(PushDeliveryError::Failed(e.to_string())),
        }
    }
}
