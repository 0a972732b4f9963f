//! Division credential handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParams, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Caller, CredentialPatch, CredentialResponse};
use crate::errors::AppResult;
use crate::services::CredentialInput;
use crate::types::{Created, CredentialEnvelope, MessageResponse};

/// New credential
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCredentialRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Payroll portal")]
    pub name: String,
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "finance-admin")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "s3cret!")]
    pub password: String,
}

/// Partial credential update; empty or missing fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCredentialRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateCredentialRequest> for CredentialPatch {
    fn from(req: UpdateCredentialRequest) -> Self {
        CredentialPatch {
            name: req.name,
            username: req.username,
            password: req.password,
        }
    }
}

pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/divisions/:division_id/credentials",
            get(list_credentials).post(create_credential),
        )
        .route(
            "/divisions/:division_id/credentials/:id",
            put(update_credential).delete(delete_credential),
        )
}

/// List a division's credentials
#[utoipa::path(
    get,
    path = "/api/divisions/{division_id}/credentials",
    tag = "Credentials",
    security(("bearer_auth" = [])),
    params(("division_id" = Uuid, Path, description = "Division ID")),
    responses(
        (status = 200, description = "Credentials of the division", body = Vec<CredentialResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller does not hold the division"),
        (status = 404, description = "Division not found")
    )
)]
pub async fn list_credentials(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    PathParams(division_id): PathParams<Uuid>,
) -> AppResult<Json<Vec<CredentialResponse>>> {
    let credentials = state.credential_service.list(&caller, division_id).await?;
    Ok(Json(
        credentials
            .into_iter()
            .map(CredentialResponse::from)
            .collect(),
    ))
}

/// Add a credential to a division
#[utoipa::path(
    post,
    path = "/api/divisions/{division_id}/credentials",
    tag = "Credentials",
    security(("bearer_auth" = [])),
    params(("division_id" = Uuid, Path, description = "Division ID")),
    request_body = CreateCredentialRequest,
    responses(
        (status = 201, description = "Credential created", body = CredentialEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller does not hold the division"),
        (status = 404, description = "Division not found")
    )
)]
pub async fn create_credential(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    PathParams(division_id): PathParams<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateCredentialRequest>,
) -> AppResult<Created<CredentialEnvelope>> {
    let input = CredentialInput {
        name: payload.name,
        username: payload.username,
        password: payload.password,
    };
    let credential = state
        .credential_service
        .create(&caller, division_id, input)
        .await?;

    Ok(Created(CredentialEnvelope::new(
        "Credential added successfully",
        credential,
    )))
}

/// Update a credential (admin or management)
#[utoipa::path(
    put,
    path = "/api/divisions/{division_id}/credentials/{id}",
    tag = "Credentials",
    security(("bearer_auth" = [])),
    params(
        ("division_id" = Uuid, Path, description = "Division ID"),
        ("id" = Uuid, Path, description = "Credential ID")
    ),
    request_body = UpdateCredentialRequest,
    responses(
        (status = 200, description = "Credential updated", body = CredentialEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not a member, or role not permitted"),
        (status = 404, description = "Division or credential not found")
    )
)]
pub async fn update_credential(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    PathParams((division_id, id)): PathParams<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<UpdateCredentialRequest>,
) -> AppResult<Json<CredentialEnvelope>> {
    let credential = state
        .credential_service
        .update(&caller, division_id, id, payload.into())
        .await?;

    Ok(Json(CredentialEnvelope::new(
        "Credential updated successfully",
        credential,
    )))
}

/// Delete a credential (admin or management)
#[utoipa::path(
    delete,
    path = "/api/divisions/{division_id}/credentials/{id}",
    tag = "Credentials",
    security(("bearer_auth" = [])),
    params(
        ("division_id" = Uuid, Path, description = "Division ID"),
        ("id" = Uuid, Path, description = "Credential ID")
    ),
    responses(
        (status = 200, description = "Credential deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not a member, or role not permitted"),
        (status = 404, description = "Division or credential not found")
    )
)]
pub async fn delete_credential(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    PathParams((division_id, id)): PathParams<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    state
        .credential_service
        .delete(&caller, division_id, id)
        .await?;

    Ok(Json(MessageResponse::new("Credential deleted successfully")))
}
