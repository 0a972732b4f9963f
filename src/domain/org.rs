//! Organizational units and divisions.
//!
//! An OU contains divisions; a division belongs to at most one OU. This is a
//! containment relation only and never grants access by itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgUnit {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl OrgUnit {
    pub fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            created_at: Utc::now(),
        }
    }
}

/// Division: owns credentials, optionally sits inside one OU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Division {
    pub id: Uuid,
    pub name: String,
    pub ou_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Division {
    pub fn new(id: Uuid, name: String, ou_id: Option<Uuid>) -> Self {
        Self {
            id,
            name,
            ou_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_in(&self, ou_id: &Uuid) -> bool {
        self.ou_id.as_ref() == Some(ou_id)
    }
}

/// Compact division reference used inside other responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionSummary {
    pub id: Uuid,
    #[schema(example = "Finance")]
    pub name: String,
}

impl From<&Division> for DivisionSummary {
    fn from(division: &Division) -> Self {
        Self {
            id: division.id,
            name: division.name.clone(),
        }
    }
}

/// Compact OU reference used inside division responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnitSummary {
    pub id: Uuid,
    #[schema(example = "News Management")]
    pub name: String,
}

/// Division as listed to clients, with its OU resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionResponse {
    pub id: Uuid,
    #[schema(example = "Finance")]
    pub name: String,
    pub ou: Option<OrgUnitSummary>,
}

impl DivisionResponse {
    /// Resolve the division's OU against a list of known OUs.
    pub fn resolve(division: &Division, ous: &[OrgUnit]) -> Self {
        let ou = division.ou_id.and_then(|ou_id| {
            ous.iter().find(|ou| ou.id == ou_id).map(|ou| OrgUnitSummary {
                id: ou.id,
                name: ou.name.clone(),
            })
        });

        Self {
            id: division.id,
            name: division.name.clone(),
            ou,
        }
    }
}

/// OU as listed to clients, with its contained divisions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnitResponse {
    pub id: Uuid,
    #[schema(example = "News Management")]
    pub name: String,
    pub divisions: Vec<DivisionSummary>,
}

impl OrgUnitResponse {
    /// Collect the divisions that currently sit inside `ou`.
    pub fn resolve(ou: &OrgUnit, divisions: &[Division]) -> Self {
        Self {
            id: ou.id,
            name: ou.name.clone(),
            divisions: divisions
                .iter()
                .filter(|d| d.is_in(&ou.id))
                .map(DivisionSummary::from)
                .collect(),
        }
    }
}
