use serde::{Deserialize, Serialize};

use crate::api::SendMessageRequest;
use crate::models::Message;

/// Frames sent FROM client TO server over the chat socket.
///
/// Internally tagged so a send frame is the flat shape
/// `{"type": "message", "conversationId": …, "content": …}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatFrame {
    Message(SendMessageRequest),
}

/// Frames sent FROM server TO client over the chat socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// A send was persisted; `data` is the full message record.
    Message { data: Message },
    /// The frame could not be processed. The connection stays open.
    Error { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageType;

    #[test]
    fn send_frame_is_flat_with_type_tag() {
        let frame: ChatFrame = serde_json::from_str(
            r#"{
                "type": "message",
                "conversationId": "6f0e4b42-12af-4b5a-9f3e-0d4a7a1f3b11",
                "senderId": "a26cc4c9-93d5-44de-b0bc-0984ff4f64b9",
                "content": "점심 먹었어요?",
                "messageType": "text"
            }"#,
        )
        .unwrap();

        let ChatFrame::Message(req) = frame;
        assert_eq!(req.content, "점심 먹었어요?");
        assert_eq!(req.message_type, MessageType::Text);
    }

    #[test]
    fn error_frame_serializes_with_type_tag() {
        let frame = ServerFrame::Error {
            error: "Failed to process message".into(),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "error", "error": "Failed to process message"})
        );
    }
}
