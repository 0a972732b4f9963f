//! Credential entity: a named username/secret pair owned by one division.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Shared credential for an external system.
///
/// The owning division is fixed at construction; there is no setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: Uuid,
    pub(crate) division_id: Uuid,
    pub name: String,
    pub username: String,
    pub secret: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(id: Uuid, division_id: Uuid, name: String, username: String, secret: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            division_id,
            name,
            username,
            secret,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn division_id(&self) -> Uuid {
        self.division_id
    }

    pub fn belongs_to(&self, division_id: &Uuid) -> bool {
        &self.division_id == division_id
    }

    /// Apply a partial update. Empty strings leave the field untouched.
    pub fn apply(&mut self, patch: &CredentialPatch) -> bool {
        let mut changed = false;

        for (field, value) in [
            (&mut self.name, &patch.name),
            (&mut self.username, &patch.username),
            (&mut self.secret, &patch.password),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                if *field != value {
                    *field = value.to_string();
                    changed = true;
                }
            }
        }

        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

/// Fields required to create a credential under a division.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub division_id: Uuid,
    pub name: String,
    pub username: String,
    pub secret: String,
}

/// Partial credential update. There is deliberately no division field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CredentialPatch {
    #[schema(example = "Payroll portal")]
    pub name: Option<String>,
    #[schema(example = "finance-bot")]
    pub username: Option<String>,
    #[schema(example = "n3w-s3cret")]
    pub password: Option<String>,
}

/// Credential as returned to division members.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    pub id: Uuid,
    pub division_id: Uuid,
    #[schema(example = "Payroll portal")]
    pub name: String,
    #[schema(example = "finance-bot")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Credential> for CredentialResponse {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id,
            division_id: credential.division_id,
            name: credential.name,
            username: credential.username,
            password: credential.secret,
            created_at: credential.created_at,
            updated_at: credential.updated_at,
        }
    }
}
