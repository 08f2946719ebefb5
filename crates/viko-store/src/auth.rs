use serde::Deserialize;
use uuid::Uuid;

use viko_types::api::AuthUser;

use crate::{Store, StoreError};

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: Uuid,
    email: Option<String>,
}

impl Store {
    /// Verify a bearer token against the auth backend.
    ///
    /// `Ok(None)` means the token was rejected (missing, malformed, or
    /// expired); transport faults surface as `Err` so callers can tell an
    /// unauthenticated request from a backend outage.
    pub async fn verify_token(&self, token: &str) -> Result<Option<AuthUser>, StoreError> {
        let resp = self.auth_user(token).send().await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED
            || resp.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(None);
        }

        let user: TokenUser = Self::check(resp).await?.json().await?;
        Ok(Some(AuthUser {
            id: user.id,
            email: user.email,
        }))
    }
}
