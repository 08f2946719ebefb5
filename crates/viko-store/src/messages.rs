use reqwest::Method;
use uuid::Uuid;

use viko_types::models::{Message, MessageOrder, NewMessage};

use crate::{Store, StoreError};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

fn order_param(order: MessageOrder) -> &'static str {
    match order {
        MessageOrder::NewestFirst => "created_at.desc",
        MessageOrder::OldestFirst => "created_at.asc",
    }
}

impl Store {
    /// Insert a message and return the stored row (backend assigns `id` and
    /// `created_at`).
    pub async fn create_message(&self, message: &NewMessage) -> Result<Message, StoreError> {
        let resp = self
            .table(Method::POST, "messages")
            .header("Prefer", "return=representation")
            .json(message)
            .send()
            .await?;

        let mut rows: Vec<Message> = Self::check(resp).await?.json().await?;
        rows.pop().ok_or(StoreError::MissingRow)
    }

    /// Page through a conversation's messages. Callers pick the ordering they
    /// need explicitly: newest-first for history paging, oldest-first for the
    /// live room fetch.
    pub async fn get_messages(
        &self,
        conversation_id: Uuid,
        limit: u32,
        offset: u32,
        order: MessageOrder,
    ) -> Result<Vec<Message>, StoreError> {
        let resp = self
            .table(Method::GET, "messages")
            .query(&[
                ("conversation_id", format!("eq.{conversation_id}")),
                ("order", order_param(order).to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await?;

        Ok(Self::check(resp).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_param_maps_both_directions() {
        assert_eq!(order_param(MessageOrder::NewestFirst), "created_at.desc");
        assert_eq!(order_param(MessageOrder::OldestFirst), "created_at.asc");
    }

    #[test]
    fn default_order_is_newest_first() {
        assert_eq!(MessageOrder::default(), MessageOrder::NewestFirst);
    }
}
