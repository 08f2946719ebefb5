use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use viko_types::api::{ApiResponse, CreateConversationRequest, SendMessageRequest};
use viko_types::models::MessageOrder;

use crate::error::ApiError;
use crate::pipeline;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationsQuery {
    pub user_id: Uuid,
}

pub async fn get_conversations(
    State(state): State<AppState>,
    Query(query): Query<ConversationsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let conversations = state.store.get_conversations(query.user_id).await?;
    Ok(Json(ApiResponse::ok(conversations)))
}

pub async fn create_conversation(
    State(state): State<AppState>,
    Json(req): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.user_id == req.target_user_id {
        return Err(ApiError::Validation(
            "cannot start a conversation with yourself".into(),
        ));
    }

    let conversation = state
        .store
        .get_or_create_conversation(req.user_id, req.target_user_id)
        .await?;
    Ok(Json(ApiResponse::ok(conversation)))
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    /// `desc` (default) pages history newest-first; the live room fetch
    /// passes `asc` for oldest-first.
    #[serde(default)]
    pub order: MessageOrder,
}

fn default_limit() -> u32 {
    viko_store::messages::DEFAULT_PAGE_SIZE
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.min(200);
    let messages = state
        .store
        .get_messages(conversation_id, limit, query.offset, query.order)
        .await?;
    Ok(Json(ApiResponse::ok(messages)))
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = pipeline::send_message(&state, req).await?;
    Ok(Json(ApiResponse::ok(message)))
}
