use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;

use viko_types::api::{ApiResponse, AuthUser, ProfileUpdateRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .store
        .get_user(user.id)
        .await?
        .ok_or(ApiError::NotFound("Profile not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(name) = &req.name {
        let chars = name.chars().count();
        if chars == 0 || chars > 100 {
            return Err(ApiError::Validation("name must be 1-100 characters".into()));
        }
    }
    if let Some(avatar_url) = &req.avatar_url {
        if !avatar_url.starts_with("http") {
            return Err(ApiError::Validation("avatar_url must be a url".into()));
        }
    }
    if req.name.is_none() && req.preferred_lang.is_none() && req.avatar_url.is_none() {
        return Err(ApiError::Validation("nothing to update".into()));
    }

    let profile = state.store.update_profile(user.id, &req).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub email: String,
}

/// Contact search by email fragment; never returns the searcher themselves.
pub async fn search_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.email.is_empty() {
        return Err(ApiError::Validation("email fragment must not be empty".into()));
    }

    let users = state.store.search_users_by_email(&query.email, user.id).await?;
    Ok(Json(ApiResponse::ok(users)))
}
