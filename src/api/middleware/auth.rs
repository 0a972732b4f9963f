//! Bearer authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Bearer authentication middleware.
///
/// Resolves the token to a `Caller` (fresh role and divisions from the
/// store) and injects it into the request extensions. Any failure ends the
/// request with 401; there is no anonymous fallback.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Access denied. No token provided."))?;

    let caller = state.auth_service.authenticate(token).await?;
    tracing::debug!(user_id = %caller.id, role = %caller.role, "Request authenticated");

    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}
