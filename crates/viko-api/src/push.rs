use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;

use viko_types::api::{ApiResponse, AuthUser, SubscribeRequest, UnsubscribeRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// Public — clients need the key before they can authenticate a subscription.
pub async fn vapid_key(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(json!({ "publicKey": state.vapid_public_key })))
}

pub async fn subscribe(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !req.endpoint.starts_with("https://") {
        return Err(ApiError::Validation("endpoint must be an https url".into()));
    }
    if req.keys.p256dh.is_empty() || req.keys.auth.is_empty() {
        return Err(ApiError::Validation("subscription keys must not be empty".into()));
    }

    state
        .notifier
        .save_subscription(user.id, &req.endpoint, &req.keys.p256dh, &req.keys.auth)
        .await?;

    Ok(Json(ApiResponse::ok_empty()))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UnsubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .notifier
        .remove_subscription(user.id, &req.endpoint)
        .await?;

    Ok(Json(ApiResponse::ok_empty()))
}
