use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// Verify the bearer token against the auth backend and attach the resolved
/// `AuthUser` as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Auth("Missing or invalid authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Auth("Missing or invalid authorization header"))?;

    let user = state
        .store
        .verify_token(token)
        .await?
        .ok_or(ApiError::Auth("Invalid or expired token"))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
