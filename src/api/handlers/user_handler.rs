//! Profile and user listing handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::{Caller, ProfileResponse, UserResponse};
use crate::errors::AppResult;

/// Create user routes (mounted under the authenticated `/api` tree)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/users", get(list_users))
}

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state.user_service.profile(&caller).await?;
    Ok(Json(profile))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users(&caller).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
