//! Authentication middleware

use axum::{
    extract::{State, Request},
    middleware::Next,
    response::Response,
    http::{header::AUTHORIZATION, HeaderMap},
};

use crate::{AppState, AppError};

const API_KEY_HEADER: &str = "x-api-key";

/// Require the admin API key, as `Authorization: Bearer <key>` or `x-api-key: <key>`
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = extract_key(request.headers()).ok_or(AppError::Unauthorized)?;

    if presented != state.config.admin_api_key {
        tracing::warn!("Rejected management request with invalid API key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

fn extract_key(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    bearer
        .or_else(|| headers.get(API_KEY_HEADER).and_then(|h| h.to_str().ok()))
        .map(str::trim)
        .filter(|k| !k.is_empty())
}
