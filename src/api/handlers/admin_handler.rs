//! Admin handlers: membership, roles and org structure.

use axum::{
    extract::State,
    response::Json,
    routing::{post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParams, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Caller, DivisionResponse, OrgUnitResponse};
use crate::errors::AppResult;
use crate::services::MembershipTarget;
use crate::types::{Created, MembershipResponse, UserEnvelope};

/// Assign or unassign request: name a division, an OU, or both
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    pub user_id: Uuid,
    pub division_id: Option<Uuid>,
    pub ou_id: Option<Uuid>,
}

impl From<MembershipRequest> for MembershipTarget {
    fn from(req: MembershipRequest) -> Self {
        MembershipTarget {
            user_id: req.user_id,
            division_id: req.division_id,
            ou_id: req.ou_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    /// Checked against the known roles only after the caller is authorized
    #[schema(example = "management")]
    pub new_role: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOuRequest {
    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    #[schema(example = "News Management")]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDivisionRequest {
    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    #[schema(example = "Finance")]
    pub name: String,
    pub ou_id: Option<Uuid>,
}

/// `ouId: null` takes the division out of its OU
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveDivisionRequest {
    pub ou_id: Option<Uuid>,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/assign-user", post(assign_user))
        .route("/unassign-user", post(unassign_user))
        .route("/change-role/:user_id", put(change_role))
        .route("/ous", post(create_ou))
        .route("/divisions", post(create_division))
        .route("/divisions/:division_id/ou", put(move_division))
}

/// Grant a user a division or every division of an OU
#[utoipa::path(
    post,
    path = "/api/admin/assign-user",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = MembershipRequest,
    responses(
        (status = 200, description = "Assignment applied (or already in place)", body = MembershipResponse),
        (status = 400, description = "Neither divisionId nor ouId given"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User, division or OU not found")
    )
)]
pub async fn assign_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(payload): ValidatedJson<MembershipRequest>,
) -> AppResult<Json<MembershipResponse>> {
    let outcome = state
        .membership_service
        .assign(&caller, payload.into())
        .await?;

    Ok(Json(MembershipResponse::from_outcome(
        outcome,
        "User assigned successfully",
    )))
}

/// Revoke a division, or every division of an OU, from a user
#[utoipa::path(
    post,
    path = "/api/admin/unassign-user",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = MembershipRequest,
    responses(
        (status = 200, description = "Unassignment applied (or nothing to remove)", body = MembershipResponse),
        (status = 400, description = "Neither divisionId nor ouId given"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User, division or OU not found")
    )
)]
pub async fn unassign_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(payload): ValidatedJson<MembershipRequest>,
) -> AppResult<Json<MembershipResponse>> {
    let outcome = state
        .membership_service
        .unassign(&caller, payload.into())
        .await?;

    Ok(Json(MembershipResponse::from_outcome(
        outcome,
        "User unassigned successfully",
    )))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/api/admin/change-role/{user_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserEnvelope),
        (status = 400, description = "Invalid role"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_role(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    PathParams(user_id): PathParams<Uuid>,
    ValidatedJson(payload): ValidatedJson<ChangeRoleRequest>,
) -> AppResult<Json<UserEnvelope>> {
    let user = state
        .user_service
        .change_role(&caller, user_id, &payload.new_role)
        .await?;

    Ok(Json(UserEnvelope::new("User role updated successfully", user)))
}

/// Create an organizational unit
#[utoipa::path(
    post,
    path = "/api/admin/ous",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateOuRequest,
    responses(
        (status = 201, description = "OU created", body = OrgUnitResponse),
        (status = 400, description = "Validation error or name taken"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn create_ou(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(payload): ValidatedJson<CreateOuRequest>,
) -> AppResult<Created<OrgUnitResponse>> {
    let ou = state.org_service.create_ou(&caller, payload.name).await?;
    Ok(Created(ou))
}

/// Create a division, optionally inside an OU
#[utoipa::path(
    post,
    path = "/api/admin/divisions",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateDivisionRequest,
    responses(
        (status = 201, description = "Division created", body = DivisionResponse),
        (status = 400, description = "Validation error or name taken"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "OU not found")
    )
)]
pub async fn create_division(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(payload): ValidatedJson<CreateDivisionRequest>,
) -> AppResult<Created<DivisionResponse>> {
    let division = state
        .org_service
        .create_division(&caller, payload.name, payload.ou_id)
        .await?;
    Ok(Created(division))
}

/// Move a division into another OU, or out of any OU
#[utoipa::path(
    put,
    path = "/api/admin/divisions/{division_id}/ou",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("division_id" = Uuid, Path, description = "Division ID")),
    request_body = MoveDivisionRequest,
    responses(
        (status = 200, description = "Division moved", body = DivisionResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Division or OU not found")
    )
)]
pub async fn move_division(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    PathParams(division_id): PathParams<Uuid>,
    ValidatedJson(payload): ValidatedJson<MoveDivisionRequest>,
) -> AppResult<Json<DivisionResponse>> {
    let division = state
        .org_service
        .move_division(&caller, division_id, payload.ou_id)
        .await?;
    Ok(Json(division))
}
