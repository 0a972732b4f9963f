//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::membership::{DivisionSet, MembershipChange, MembershipDelta};
use super::org::{Division, DivisionSummary};
use crate::config::{ROLE_ADMIN, ROLE_MANAGEMENT, ROLE_USER};
use crate::errors::AppError;

/// User roles enumeration.
///
/// Roles are not ordered: every action lists the roles it accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Management,
    Admin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => ROLE_USER,
            UserRole::Management => ROLE_MANAGEMENT,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(UserRole::User),
            ROLE_MANAGEMENT => Ok(UserRole::Management),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(AppError::InvalidRole(other.to_string())),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub divisions: DivisionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user: role `user`, no divisions.
    pub fn new(id: Uuid, username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            password_hash,
            role: UserRole::User,
            divisions: DivisionSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Direct grant check. OU containment is never consulted.
    pub fn has_division(&self, division_id: &Uuid) -> bool {
        self.divisions.contains(division_id)
    }

    /// Apply a membership change, bumping `updated_at` only if something moved.
    pub fn apply_membership(&mut self, change: &MembershipChange) -> MembershipDelta {
        let delta = change.apply(&mut self.divisions);
        if !delta.is_empty() {
            self.updated_at = Utc::now();
        }
        delta
    }

    /// Set the role, returning whether it differed.
    pub fn update_role(&mut self, role: UserRole) -> bool {
        if self.role == role {
            return false;
        }
        self.role = role;
        self.updated_at = Utc::now();
        true
    }
}

/// Data needed to persist a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Login name
    #[schema(example = "alice")]
    pub username: String,
    /// User role
    pub role: UserRole,
    /// Divisions the user has been granted
    pub divisions: Vec<Uuid>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            divisions: user.divisions.to_vec(),
            created_at: user.created_at,
        }
    }
}

/// The caller's own profile, with granted divisions expanded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    pub role: UserRole,
    pub divisions: Vec<DivisionSummary>,
    pub created_at: DateTime<Utc>,
}

impl ProfileResponse {
    /// Build the profile from the user and the divisions it holds.
    ///
    /// Grants pointing at divisions missing from `divisions` are skipped.
    pub fn resolve(user: &User, divisions: &[Division]) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            divisions: divisions
                .iter()
                .filter(|d| user.has_division(&d.id))
                .map(DivisionSummary::from)
                .collect(),
            created_at: user.created_at,
        }
    }
}

/// Result of a membership or role mutation.
#[derive(Debug, Clone)]
pub struct MembershipOutcome {
    pub user: User,
    /// False when the request was a no-op and nothing was persisted.
    pub changed: bool,
}
