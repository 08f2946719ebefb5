use reqwest::Method;
use uuid::Uuid;

use viko_types::api::ProfileUpdateRequest;
use viko_types::models::{User, UserSummary};

use crate::{Store, StoreError};

const SEARCH_LIMIT: u32 = 20;
const SUMMARY_COLUMNS: &str = "id,email,name,avatar_url,preferred_lang";

impl Store {
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let resp = self
            .table(Method::GET, "users")
            .query(&[("id", format!("eq.{id}")), ("limit", "1".to_string())])
            .send()
            .await?;

        let mut rows: Vec<User> = Self::check(resp).await?.json().await?;
        Ok(rows.pop())
    }

    /// Apply a partial profile update and return the updated row.
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdateRequest,
    ) -> Result<User, StoreError> {
        let mut patch = serde_json::Map::new();
        if let Some(name) = &update.name {
            patch.insert("name".into(), serde_json::json!(name));
        }
        if let Some(lang) = update.preferred_lang {
            patch.insert("preferred_lang".into(), serde_json::json!(lang));
        }
        if let Some(avatar_url) = &update.avatar_url {
            patch.insert("avatar_url".into(), serde_json::json!(avatar_url));
        }

        let resp = self
            .table(Method::PATCH, "users")
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .json(&patch)
            .send()
            .await?;

        let mut rows: Vec<User> = Self::check(resp).await?.json().await?;
        rows.pop().ok_or(StoreError::MissingRow)
    }

    /// Case-insensitive substring search over emails, excluding the searcher.
    pub async fn search_users_by_email(
        &self,
        fragment: &str,
        exclude_user_id: Uuid,
    ) -> Result<Vec<UserSummary>, StoreError> {
        let resp = self
            .table(Method::GET, "users")
            .query(&[
                ("select", SUMMARY_COLUMNS.to_string()),
                ("email", format!("ilike.*{fragment}*")),
                ("id", format!("neq.{exclude_user_id}")),
                ("limit", SEARCH_LIMIT.to_string()),
            ])
            .send()
            .await?;

        Ok(Self::check(resp).await?.json().await?)
    }
}
