pub mod auth;
pub mod conversations;
pub mod error;
pub mod messages;
pub mod subscriptions;
pub mod users;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};

pub use error::StoreError;

/// Client for the managed data backend: table-like collections over a
/// PostgREST-style REST surface plus bearer-token verification.
///
/// All table access runs with the service-role key; row-level policies are
/// the backend's concern, not this client's.
pub struct Store {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl Store {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Result<Self, StoreError> {
        let service_key = service_key.into();

        let mut headers = HeaderMap::new();
        let apikey = HeaderValue::from_str(&service_key)
            .map_err(|_| StoreError::Config("service key contains invalid header bytes".into()))?;
        headers.insert("apikey", apikey);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("data backend client ready for {base_url}");

        Ok(Self {
            http,
            base_url,
            service_key,
        })
    }

    /// Start a request against `/rest/v1/{table}` with service-role auth.
    fn table(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .bearer_auth(&self.service_key)
    }

    /// Start a request against the auth endpoint with the caller's token.
    fn auth_user(&self, token: &str) -> RequestBuilder {
        self.http
            .get(format!("{}/auth/v1/user", self.base_url))
            .bearer_auth(token)
    }

    /// Map non-2xx responses to `StoreError::Status`, keeping the body for
    /// the log line.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::Status { status, body })
    }
}
