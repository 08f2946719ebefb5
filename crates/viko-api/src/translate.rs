use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::json;

use viko_types::api::{ApiResponse, DetectRequest, TranslateRequest};

use crate::error::ApiError;
use crate::pipeline::MAX_CONTENT_CHARS;
use crate::state::AppState;

/// Standalone translation, used by the composer's preview. Unlike the send
/// pipeline, adapter failures surface here — there is nothing to fall back to.
pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let chars = req.text.chars().count();
    if chars == 0 || chars > MAX_CONTENT_CHARS {
        return Err(ApiError::Validation(format!(
            "text must be 1-{MAX_CONTENT_CHARS} characters"
        )));
    }

    let context = req.context.unwrap_or_default();
    let result = state.translator.translate(&req.text, &context).await?;
    Ok(Json(ApiResponse::ok(result)))
}

pub async fn detect_language(
    State(state): State<AppState>,
    Json(req): Json<DetectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("text must not be empty".into()));
    }

    let language = state.translator.detect_language(&req.text).await?;
    Ok(Json(ApiResponse::ok(json!({ "language": language }))))
}
