//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, credential_handler, org_handler, user_handler,
};
use crate::domain::{
    CredentialResponse, DivisionResponse, DivisionSummary, OrgUnitResponse, OrgUnitSummary,
    ProfileResponse, UserResponse, UserRole,
};
use crate::services::AuthResponse;
use crate::types::{CredentialEnvelope, MembershipResponse, MessageResponse, UserEnvelope};

/// OpenAPI documentation for the Credential Vault API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Credential Vault API",
        version = "0.1.0",
        description = "Division-scoped credential sharing with role-gated access",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // User endpoints
        user_handler::get_current_user,
        user_handler::list_users,
        // Organization endpoints
        org_handler::list_divisions,
        org_handler::list_ous,
        // Credential endpoints
        credential_handler::list_credentials,
        credential_handler::create_credential,
        credential_handler::update_credential,
        credential_handler::delete_credential,
        // Admin endpoints
        admin_handler::assign_user,
        admin_handler::unassign_user,
        admin_handler::change_role,
        admin_handler::create_ou,
        admin_handler::create_division,
        admin_handler::move_division,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            ProfileResponse,
            DivisionSummary,
            DivisionResponse,
            OrgUnitSummary,
            OrgUnitResponse,
            CredentialResponse,
            // Response envelopes
            AuthResponse,
            MessageResponse,
            CredentialEnvelope,
            MembershipResponse,
            UserEnvelope,
            // Request bodies
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            credential_handler::CreateCredentialRequest,
            credential_handler::UpdateCredentialRequest,
            admin_handler::MembershipRequest,
            admin_handler::ChangeRoleRequest,
            admin_handler::CreateOuRequest,
            admin_handler::CreateDivisionRequest,
            admin_handler::MoveDivisionRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "Profile and user listing"),
        (name = "Organization", description = "OUs and divisions"),
        (name = "Credentials", description = "Division-scoped credentials"),
        (name = "Admin", description = "Membership, roles and org structure")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /login"))
                        .build(),
                ),
            );
        }
    }
}
