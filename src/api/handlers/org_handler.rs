//! Org structure listing handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::{Caller, DivisionResponse, OrgUnitResponse};
use crate::errors::AppResult;

pub fn org_routes() -> Router<AppState> {
    Router::new()
        .route("/divisions", get(list_divisions))
        .route("/ous", get(list_ous))
}

/// List all divisions with their OU
#[utoipa::path(
    get,
    path = "/api/divisions",
    tag = "Organization",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All divisions", body = Vec<DivisionResponse>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_divisions(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<Vec<DivisionResponse>>> {
    Ok(Json(state.org_service.list_divisions(&caller).await?))
}

/// List all OUs with their divisions
#[utoipa::path(
    get,
    path = "/api/ous",
    tag = "Organization",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All organizational units", body = Vec<OrgUnitResponse>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_ous(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<Vec<OrgUnitResponse>>> {
    Ok(Json(state.org_service.list_ous(&caller).await?))
}
