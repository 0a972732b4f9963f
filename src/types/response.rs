use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CredentialResponse, MembershipOutcome, UserResponse};

/// Message-only response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Credential deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A credential together with a human-readable outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CredentialEnvelope {
    #[schema(example = "Credential added successfully")]
    pub message: String,
    pub credential: CredentialResponse,
}

impl CredentialEnvelope {
    pub fn new(message: impl Into<String>, credential: impl Into<CredentialResponse>) -> Self {
        Self {
            message: message.into(),
            credential: credential.into(),
        }
    }
}

/// A user together with a human-readable outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    #[schema(example = "User role updated successfully")]
    pub message: String,
    pub user: UserResponse,
}

impl UserEnvelope {
    pub fn new(message: impl Into<String>, user: impl Into<UserResponse>) -> Self {
        Self {
            message: message.into(),
            user: user.into(),
        }
    }
}

/// Result of an assign or unassign request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MembershipResponse {
    #[schema(example = "User assigned successfully")]
    pub message: String,
    /// False when the user already had (or already lacked) every named division
    pub changed: bool,
    pub user: UserResponse,
}

impl MembershipResponse {
    /// Build the response, substituting the no-op message when nothing changed.
    pub fn from_outcome(outcome: MembershipOutcome, success_message: &str) -> Self {
        let message = if outcome.changed {
            success_message
        } else {
            "No changes made"
        };

        Self {
            message: message.to_string(),
            changed: outcome.changed,
            user: UserResponse::from(outcome.user),
        }
    }
}

/// Created response helper (common pattern for POST endpoints)
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}
