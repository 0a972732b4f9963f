//! Repository layer - Data access abstraction
//!
//! One repository per store: identity, org hierarchy, credentials.

mod credential_repository;
pub(crate) mod entities;
mod org_repository;
mod user_repository;

pub use credential_repository::{CredentialRepository, CredentialStore};
pub use org_repository::{OrgRepository, OrgStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use credential_repository::MockCredentialRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use org_repository::MockOrgRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
