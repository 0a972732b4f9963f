//! Division grant sets and the changes applied to them.
//!
//! A user's `DivisionSet` is the only thing consulted when deciding access
//! to a division. OU membership never appears here directly: granting an OU
//! is expanded by the caller into the OU's divisions at that moment.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unordered set of division ids, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DivisionSet(BTreeSet<Uuid>);

impl DivisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, division_id: &Uuid) -> bool {
        self.0.contains(division_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uuid> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<Uuid> {
        self.0.iter().copied().collect()
    }

    /// Add divisions, returning those that were not already present.
    pub fn grant<'a>(&mut self, ids: impl IntoIterator<Item = &'a Uuid>) -> Vec<Uuid> {
        ids.into_iter()
            .filter(|id| self.0.insert(**id))
            .copied()
            .collect()
    }

    /// Remove divisions, returning those that were actually present.
    pub fn revoke<'a>(&mut self, ids: impl IntoIterator<Item = &'a Uuid>) -> Vec<Uuid> {
        ids.into_iter()
            .filter(|id| self.0.remove(*id))
            .copied()
            .collect()
    }
}

impl FromIterator<Uuid> for DivisionSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DivisionSet {
    type Item = &'a Uuid;
    type IntoIter = std::collections::btree_set::Iter<'a, Uuid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A concrete change to one user's grant set.
///
/// OU-level requests are resolved to division ids before a change is built,
/// so a change always describes exactly the divisions it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    Grant(Vec<Uuid>),
    Revoke(Vec<Uuid>),
}

impl MembershipChange {
    /// Apply to a grant set and report what actually moved.
    pub fn apply(&self, set: &mut DivisionSet) -> MembershipDelta {
        match self {
            MembershipChange::Grant(ids) => MembershipDelta {
                added: set.grant(ids),
                removed: Vec::new(),
            },
            MembershipChange::Revoke(ids) => MembershipDelta {
                added: Vec::new(),
                removed: set.revoke(ids),
            },
        }
    }

    pub fn division_ids(&self) -> &[Uuid] {
        match self {
            MembershipChange::Grant(ids) | MembershipChange::Revoke(ids) => ids,
        }
    }
}

/// Divisions added to and removed from a grant set by one change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDelta {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

impl MembershipDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
