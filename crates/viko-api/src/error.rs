use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use viko_store::StoreError;
use viko_translate::TranslateError;
use viko_types::api::ApiResponse;

/// Errors that reach the client. Everything renders as the
/// `{success: false, error}` envelope; only validation and persistence
/// failures originate from the send path — translation and push failures
/// degrade before they get here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    /// Direct translation endpoints surface adapter failures; the send
    /// pipeline never does.
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// Persistence faults are fatal to the enclosing request.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, (*msg).to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, (*msg).to_string()),
            ApiError::Translate(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            ApiError::Store(err) => {
                error!("persistence failure: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
            ApiError::Internal(err) => {
                error!("internal error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}
