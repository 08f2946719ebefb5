use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two languages the app translates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ko,
    Vi,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Ko => "ko",
            Lang::Vi => "vi",
        }
    }

    /// The translation target for a given source.
    pub fn other(&self) -> Lang {
        match self {
            Lang::Ko => Lang::Vi,
            Lang::Vi => Lang::Ko,
        }
    }
}

/// Single-label language detection result. Anything the model returns
/// besides `ko` or `vi` normalizes to `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detected {
    Ko,
    Vi,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    File,
}

impl Default for MessageType {
    fn default() -> Self {
        MessageType::Text
    }
}

impl MessageType {
    pub fn is_text(&self) -> bool {
        matches!(self, MessageType::Text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub avatar_url: Option<String>,
    pub preferred_lang: Lang,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection returned by contact search. Never exposes timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub avatar_url: Option<String>,
    pub preferred_lang: Lang,
}

/// An unordered pair of users. At most one conversation exists per pair;
/// lookups must match both column orderings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Resolve the peer of `user_id` in this conversation, or `None` if the
    /// user is not a participant.
    pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
        if self.user1_id == user_id {
            Some(self.user2_id)
        } else if self.user2_id == user_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

/// A persisted chat message. Created once by the send pipeline and never
/// mutated afterwards; `read_at` stays null in this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub translated: Option<String>,
    pub source_lang: Lang,
    pub target_lang: Lang,
    #[serde(default)]
    pub message_type: MessageType,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a message — the backend assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub translated: Option<String>,
    pub source_lang: Lang,
    pub target_lang: Lang,
    pub message_type: MessageType,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

/// Strict result shape extracted from the translation model's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated: String,
    pub source_lang: Lang,
    pub target_lang: Lang,
}

/// Translation fields as they land on a message. `Default` carries the
/// fallback used whenever translation is skipped or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTranslation {
    pub translated: Option<String>,
    pub source_lang: Lang,
    pub target_lang: Lang,
}

impl Default for MessageTranslation {
    fn default() -> Self {
        Self {
            translated: None,
            source_lang: Lang::Ko,
            target_lang: Lang::Vi,
        }
    }
}

impl From<Translation> for MessageTranslation {
    fn from(t: Translation) -> Self {
        Self {
            translated: Some(t.translated),
            source_lang: t.source_lang,
            target_lang: t.target_lang,
        }
    }
}

/// One browser push endpoint for a user, keyed by (`user_id`, `endpoint`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSubscriptionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

/// Ordering for message pages. History paging reads newest-first; the live
/// room fetch asks for oldest-first explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageOrder {
    #[serde(rename = "desc")]
    NewestFirst,
    #[serde(rename = "asc")]
    OldestFirst,
}

impl Default for MessageOrder {
    fn default() -> Self {
        MessageOrder::NewestFirst
    }
}
