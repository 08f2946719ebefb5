//! Client-side chat state: one owned container for conversations and the
//! open room's messages, plus the optimistic-send reconciliation that keeps
//! it consistent with the server and the realtime feed.
//!
//! Single-threaded by design — the consumer drives it from one event loop,
//! so mutation goes through `&mut self` entry points rather than locks.

use chrono::Utc;
use uuid::Uuid;

use viko_types::models::{Conversation, Message, MessageTranslation, MessageType};

/// The only holder of client-visible chat state. All mutation flows through
/// the methods below; nothing else touches the lists.
#[derive(Debug, Default)]
pub struct ChatStore {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Messages of the currently open room, oldest-first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Swap the entry with `id` for `message`, keeping its list position.
    /// Returns `false` (and changes nothing) when no entry matches.
    pub fn replace_message(&mut self, id: Uuid, message: Message) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(slot) => {
                *slot = message;
                true
            }
            None => false,
        }
    }

    /// Returns `true` when an entry was removed.
    pub fn remove_message(&mut self, id: Uuid) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    pub fn contains_message(&self, id: Uuid) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }
}

/// Per-send lifecycle: an optimistic entry is `pending` under a local id,
/// then either confirmed (server fields merged in) or rolled back.
pub struct ChatSession {
    store: ChatStore,
    local_user: Uuid,
}

impl ChatSession {
    pub fn new(local_user: Uuid) -> Self {
        Self {
            store: ChatStore::new(),
            local_user,
        }
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ChatStore {
        &mut self.store
    }

    /// Insert a pending text message under a locally generated id, shown
    /// immediately. Returns the temp id to reconcile with, or `None` for
    /// blank input.
    pub fn begin_send(&mut self, conversation_id: Uuid, content: &str) -> Option<Uuid> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let temp_id = Uuid::new_v4();
        let fallback = MessageTranslation::default();

        self.store.add_message(Message {
            id: temp_id,
            conversation_id,
            sender_id: self.local_user,
            content: content.to_string(),
            translated: fallback.translated,
            source_lang: fallback.source_lang,
            target_lang: fallback.target_lang,
            message_type: MessageType::Text,
            file_url: None,
            file_name: None,
            file_size: None,
            read_at: None,
            created_at: Utc::now(),
        });

        Some(temp_id)
    }

    /// The send succeeded: merge the server record (real id, timestamp,
    /// translation) into the pending entry, preserving its position.
    pub fn confirm_send(&mut self, temp_id: Uuid, message: Message) {
        self.store.replace_message(temp_id, message);
    }

    /// The send failed: drop the pending entry entirely. No error-state
    /// message lingers in the list.
    pub fn fail_send(&mut self, temp_id: Uuid) {
        self.store.remove_message(temp_id);
    }

    /// Apply a message arriving over the realtime channel. Frames echoing
    /// the local user's own sends are dropped — the optimistic entry (or its
    /// confirmed replacement) already covers them. Returns whether the
    /// message was added.
    pub fn receive_remote(&mut self, message: Message) -> bool {
        if message.sender_id == self.local_user {
            return false;
        }
        self.store.add_message(message);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viko_types::models::Lang;

    fn server_message(conversation_id: Uuid, sender_id: Uuid, content: &str) -> Message {
        Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content: content.to_string(),
            translated: Some("dịch rồi".into()),
            source_lang: Lang::Ko,
            target_lang: Lang::Vi,
            message_type: MessageType::Text,
            file_url: None,
            file_name: None,
            file_size: None,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn begin_send_inserts_pending_entry_immediately() {
        let me = Uuid::new_v4();
        let conv = Uuid::new_v4();
        let mut session = ChatSession::new(me);

        let temp_id = session.begin_send(conv, "  안녕하세요  ").unwrap();

        let messages = session.store().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, temp_id);
        assert_eq!(messages[0].content, "안녕하세요");
        assert_eq!(messages[0].translated, None);
        assert_eq!(messages[0].source_lang, Lang::Ko);
        assert_eq!(messages[0].target_lang, Lang::Vi);
    }

    #[test]
    fn blank_input_never_creates_a_pending_entry() {
        let mut session = ChatSession::new(Uuid::new_v4());
        assert!(session.begin_send(Uuid::new_v4(), "   ").is_none());
        assert!(session.store().messages().is_empty());
    }

    #[test]
    fn confirm_send_replaces_fields_preserving_position() {
        let me = Uuid::new_v4();
        let conv = Uuid::new_v4();
        let mut session = ChatSession::new(me);

        // An earlier message is already on screen.
        let earlier = server_message(conv, Uuid::new_v4(), "trước đó");
        session.store_mut().add_message(earlier);

        let temp_id = session.begin_send(conv, "안녕").unwrap();
        let confirmed = server_message(conv, me, "안녕");
        let server_id = confirmed.id;

        session.confirm_send(temp_id, confirmed);

        let messages = session.store().messages();
        assert_eq!(messages.len(), 2);
        // Still in slot 1, now under the server id with translation merged.
        assert_eq!(messages[1].id, server_id);
        assert_eq!(messages[1].translated.as_deref(), Some("dịch rồi"));
        assert!(!session.store().contains_message(temp_id));
    }

    #[test]
    fn fail_send_leaves_no_residual_entry() {
        let me = Uuid::new_v4();
        let conv = Uuid::new_v4();
        let mut session = ChatSession::new(me);

        let temp_id = session.begin_send(conv, "보내다가 실패").unwrap();
        session.fail_send(temp_id);

        assert!(session.store().messages().is_empty());
        assert!(!session.store().contains_message(temp_id));
    }

    #[test]
    fn realtime_echo_of_own_send_is_dropped() {
        let me = Uuid::new_v4();
        let conv = Uuid::new_v4();
        let mut session = ChatSession::new(me);

        let temp_id = session.begin_send(conv, "안녕").unwrap();
        let confirmed = server_message(conv, me, "안녕");
        session.confirm_send(temp_id, confirmed.clone());

        // The backend's change feed now echoes the same insert.
        assert!(!session.receive_remote(confirmed));
        assert_eq!(session.store().messages().len(), 1);
    }

    #[test]
    fn realtime_message_from_peer_is_added() {
        let me = Uuid::new_v4();
        let conv = Uuid::new_v4();
        let mut session = ChatSession::new(me);

        let incoming = server_message(conv, Uuid::new_v4(), "em ăn cơm chưa?");
        assert!(session.receive_remote(incoming.clone()));
        assert_eq!(session.store().messages().last().unwrap().id, incoming.id);
    }

    #[test]
    fn store_mutations_are_the_only_entry_points() {
        let mut store = ChatStore::new();
        let conv = Uuid::new_v4();

        let first = server_message(conv, Uuid::new_v4(), "một");
        let second = server_message(conv, Uuid::new_v4(), "hai");
        store.set_messages(vec![first.clone(), second.clone()]);
        assert_eq!(store.messages().len(), 2);

        assert!(store.remove_message(first.id));
        assert!(!store.remove_message(first.id));
        assert_eq!(store.messages().len(), 1);

        let replacement = server_message(conv, Uuid::new_v4(), "ba");
        assert!(store.replace_message(second.id, replacement.clone()));
        assert_eq!(store.messages()[0].id, replacement.id);

        store.set_messages(Vec::new());
        assert!(store.messages().is_empty());
    }
}
