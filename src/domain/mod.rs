//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the access policy, independent of
//! persistence and transport.

pub mod credential;
pub mod membership;
pub mod org;
pub mod password;
pub mod policy;
pub mod user;

pub use credential::{Credential, CredentialPatch, CredentialResponse, NewCredential};
pub use membership::{DivisionSet, MembershipChange, MembershipDelta};
pub use org::{
    Division, DivisionResponse, DivisionSummary, OrgUnit, OrgUnitResponse, OrgUnitSummary,
};
pub use password::Password;
pub use policy::{authorize, decide, Action, Caller, Decision, DenyReason, Resource};
pub use user::{MembershipOutcome, NewUser, ProfileResponse, User, UserResponse, UserRole};
