use tracing::{debug, warn};
use uuid::Uuid;

use viko_types::api::{PushPayload, SendMessageRequest};
use viko_types::models::{Message, MessageOrder, MessageTranslation, MessageType, NewMessage};

use crate::error::ApiError;
use crate::state::AppState;

pub const MAX_CONTENT_CHARS: usize = 5000;

/// Preview text is capped at this many characters in push notifications.
const PREVIEW_CHARS: usize = 50;

/// How many prior messages are offered to the translator as context.
const CONTEXT_MESSAGES: u32 = 5;

/// The message send pipeline.
///
/// 1. Text messages get a best-effort translation — on any adapter failure
///    the send proceeds untranslated with fallback language fields.
/// 2. Persistence is mandatory; a store fault fails the whole send.
/// 3. Push notification to the other participant is detached — spawned
///    without a join back to the response, all failures logged only.
///
/// Returns the persisted message with its backend-assigned id and timestamp.
pub async fn send_message(
    state: &AppState,
    req: SendMessageRequest,
) -> Result<Message, ApiError> {
    validate_send(&req)?;

    let translation = if req.message_type.is_text() {
        let context = recent_context(state, req.conversation_id).await;
        match state.translator.translate(&req.content, &context).await {
            Ok(t) => t.into(),
            Err(err) => {
                warn!("translation failed, saving without translation: {err}");
                MessageTranslation::default()
            }
        }
    } else {
        // Attachments carry no translatable text.
        MessageTranslation::default()
    };

    let new_message = NewMessage {
        conversation_id: req.conversation_id,
        sender_id: req.sender_id,
        content: req.content,
        translated: translation.translated,
        source_lang: translation.source_lang,
        target_lang: translation.target_lang,
        message_type: req.message_type,
        file_url: req.file_url,
        file_name: req.file_name,
        file_size: req.file_size,
    };

    let message = state.store.create_message(&new_message).await?;

    spawn_push_notification(state.clone(), message.clone());

    Ok(message)
}

pub fn validate_send(req: &SendMessageRequest) -> Result<(), ApiError> {
    let chars = req.content.chars().count();
    if chars == 0 || chars > MAX_CONTENT_CHARS {
        return Err(ApiError::Validation(format!(
            "content must be 1-{MAX_CONTENT_CHARS} characters"
        )));
    }

    let has_attachment =
        req.file_url.is_some() || req.file_name.is_some() || req.file_size.is_some();

    match req.message_type {
        MessageType::Text if has_attachment => Err(ApiError::Validation(
            "text messages cannot carry attachment fields".into(),
        )),
        MessageType::Image | MessageType::Video | MessageType::File if req.file_url.is_none() => {
            Err(ApiError::Validation(
                "attachment messages require a file url".into(),
            ))
        }
        _ => Ok(()),
    }
}

/// Last few prior messages of the conversation, oldest-first, for the
/// translator. Context is an enrichment — a fetch failure means no context,
/// never a failed send.
async fn recent_context(state: &AppState, conversation_id: Uuid) -> Vec<String> {
    match state
        .store
        .get_messages(conversation_id, CONTEXT_MESSAGES, 0, MessageOrder::NewestFirst)
        .await
    {
        Ok(mut messages) => {
            messages.reverse();
            messages.into_iter().map(|m| m.content).collect()
        }
        Err(err) => {
            debug!("context fetch failed, translating without context: {err}");
            Vec::new()
        }
    }
}

/// Fire-and-forget: the sender's response never waits on push delivery, and
/// nothing cancels the task once spawned.
fn spawn_push_notification(state: AppState, message: Message) {
    tokio::spawn(async move {
        if let Err(err) = notify_recipient(&state, &message).await {
            warn!("push notification failed: {err:#}");
        }
    });
}

async fn notify_recipient(state: &AppState, message: &Message) -> anyhow::Result<()> {
    let Some(conversation) = state.store.get_conversation(message.conversation_id).await? else {
        debug!(conversation = %message.conversation_id, "conversation vanished before push");
        return Ok(());
    };

    let Some(recipient) = conversation.other_participant(message.sender_id) else {
        debug!(sender = %message.sender_id, "sender is not a participant, skipping push");
        return Ok(());
    };

    let sender_name = state
        .store
        .get_user(message.sender_id)
        .await
        .ok()
        .flatten()
        .map(|u| u.name)
        .unwrap_or_else(|| "Someone".to_string());

    let payload = PushPayload {
        title: sender_name,
        body: notification_preview(message.message_type, &message.content),
        url: Some(format!("/chat/{}", message.conversation_id)),
    };

    state.notifier.send_to_user(recipient, &payload).await
}

/// Notification body: the first 50 characters of text content (ellipsized
/// when longer), or a fixed caption for attachments.
pub fn notification_preview(message_type: MessageType, content: &str) -> String {
    match message_type {
        MessageType::Image => "📷 Photo".to_string(),
        MessageType::Video => "🎬 Video".to_string(),
        MessageType::File => "📎 File".to_string(),
        MessageType::Text => {
            if content.chars().count() > PREVIEW_CHARS {
                let truncated: String = content.chars().take(PREVIEW_CHARS).collect();
                format!("{truncated}...")
            } else {
                content.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send_request(content: &str) -> SendMessageRequest {
        SendMessageRequest {
            conversation_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            content: content.to_string(),
            message_type: MessageType::Text,
            file_url: None,
            file_name: None,
            file_size: None,
        }
    }

    #[test]
    fn rejects_empty_and_oversized_content() {
        assert!(validate_send(&send_request("")).is_err());
        assert!(validate_send(&send_request(&"가".repeat(5001))).is_err());
        // 5000 multi-byte chars are in range — the limit counts characters,
        // not bytes.
        assert!(validate_send(&send_request(&"가".repeat(5000))).is_ok());
    }

    #[test]
    fn rejects_attachment_fields_on_text_messages() {
        let mut req = send_request("hello");
        req.file_url = Some("https://cdn.example/photo.jpg".into());
        assert!(validate_send(&req).is_err());
    }

    #[test]
    fn attachment_messages_require_a_url() {
        let mut req = send_request("photo.jpg");
        req.message_type = MessageType::Image;
        assert!(validate_send(&req).is_err());

        req.file_url = Some("https://cdn.example/photo.jpg".into());
        assert!(validate_send(&req).is_ok());
    }

    #[test]
    fn short_text_preview_passes_through() {
        assert_eq!(
            notification_preview(MessageType::Text, "점심 먹었어요?"),
            "점심 먹었어요?"
        );
    }

    #[test]
    fn long_text_preview_truncates_at_fifty_chars() {
        let content = "가".repeat(80);
        let preview = notification_preview(MessageType::Text, &content);
        assert_eq!(preview, format!("{}...", "가".repeat(50)));

        // Exactly 50 characters is untouched.
        let exact = "나".repeat(50);
        assert_eq!(notification_preview(MessageType::Text, &exact), exact);
    }

    #[test]
    fn attachment_previews_are_fixed_captions() {
        assert_eq!(notification_preview(MessageType::Image, "ignored"), "📷 Photo");
        assert_eq!(notification_preview(MessageType::Video, "ignored"), "🎬 Video");
        assert_eq!(notification_preview(MessageType::File, "ignored"), "📎 File");
    }
}
