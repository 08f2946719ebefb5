use reqwest::StatusCode;
use thiserror::Error;

/// Faults from the persistence backend. Propagated unchanged to callers;
/// the send pipeline treats any of these as fatal to the enclosing request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("expected a row, backend returned none")]
    MissingRow,

    #[error("store misconfigured: {0}")]
    Config(String),
}
