//! Access control decisions.
//!
//! Every route asks `decide` rather than checking roles itself. The table in
//! `Action::requirement` is the complete rule set: membership is always a
//! direct lookup in the caller's grant set, and no role implies another.

use uuid::Uuid;

use super::membership::DivisionSet;
use super::user::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// Roles allowed to modify or delete credentials in divisions they hold.
const ELEVATED: &[UserRole] = &[UserRole::Admin, UserRole::Management];

/// Roles allowed to administer users and org structure.
const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Authenticated identity as resolved from the token and the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub divisions: DivisionSet,
}

impl Caller {
    pub fn holds(&self, division_id: &Uuid) -> bool {
        self.divisions.contains(division_id)
    }
}

impl From<User> for Caller {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            divisions: user.divisions,
        }
    }
}

/// Operations subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewCredentials,
    CreateCredential,
    UpdateCredential,
    DeleteCredential,
    ListUsers,
    AssignMembership,
    UnassignMembership,
    ChangeRole,
    ManageOrgStructure,
    ViewOrgStructure,
}

/// What a resource-level check is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Division(Uuid),
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Authenticated,
    Member,
    MemberWithRole(&'static [UserRole]),
    Role(&'static [UserRole]),
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::ViewCredentials,
        Action::CreateCredential,
        Action::UpdateCredential,
        Action::DeleteCredential,
        Action::ListUsers,
        Action::AssignMembership,
        Action::UnassignMembership,
        Action::ChangeRole,
        Action::ManageOrgStructure,
        Action::ViewOrgStructure,
    ];

    const fn requirement(self) -> Requirement {
        match self {
            Action::ViewCredentials | Action::CreateCredential => Requirement::Member,
            Action::UpdateCredential | Action::DeleteCredential => {
                Requirement::MemberWithRole(ELEVATED)
            }
            Action::ListUsers
            | Action::AssignMembership
            | Action::UnassignMembership
            | Action::ChangeRole
            | Action::ManageOrgStructure => Requirement::Role(ADMIN_ONLY),
            Action::ViewOrgStructure => Requirement::Authenticated,
        }
    }

    /// Message shown when the action is denied.
    pub fn denial_message(self) -> &'static str {
        match self {
            Action::ViewCredentials => {
                "Access denied. You do not have permission to view this division."
            }
            Action::CreateCredential => {
                "Access denied. No permission to add credentials to this division."
            }
            Action::UpdateCredential => {
                "Access denied. Permission to update credentials required."
            }
            Action::DeleteCredential => {
                "Access denied. Permission to delete credentials required."
            }
            Action::ListUsers => "Access denied. Only admins can view users.",
            Action::AssignMembership => "Access denied. Only admins can assign users.",
            Action::UnassignMembership => "Access denied. Only admins can unassign users.",
            Action::ChangeRole => "Access denied. Only admins can change roles.",
            Action::ManageOrgStructure => {
                "Access denied. Only admins can change the organization structure."
            }
            Action::ViewOrgStructure => "Access denied.",
        }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotMember,
    RoleNotPermitted,
    /// A division-scoped action was asked about a non-division resource.
    WrongResource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Evaluate the policy table for `caller` performing `action` on `resource`.
pub fn decide(caller: &Caller, action: Action, resource: Resource) -> Decision {
    let role_ok = |roles: &[UserRole]| roles.contains(&caller.role);

    match (action.requirement(), resource) {
        (Requirement::Authenticated, _) => Decision::Allow,
        (Requirement::Role(roles), _) => {
            if role_ok(roles) {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::RoleNotPermitted)
            }
        }
        (Requirement::Member, Resource::Division(id)) => {
            if caller.holds(&id) {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotMember)
            }
        }
        (Requirement::MemberWithRole(roles), Resource::Division(id)) => {
            if !caller.holds(&id) {
                Decision::Deny(DenyReason::NotMember)
            } else if !role_ok(roles) {
                Decision::Deny(DenyReason::RoleNotPermitted)
            } else {
                Decision::Allow
            }
        }
        (Requirement::Member | Requirement::MemberWithRole(_), Resource::System) => {
            Decision::Deny(DenyReason::WrongResource)
        }
    }
}

/// `decide`, turned into a `Forbidden` error on denial.
pub fn authorize(caller: &Caller, action: Action, resource: Resource) -> AppResult<()> {
    match decide(caller, action, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::warn!(
                user_id = %caller.id,
                role = %caller.role,
                ?action,
                ?resource,
                ?reason,
                "Access denied"
            );
            Err(AppError::forbidden(action.denial_message()))
        }
    }
}
