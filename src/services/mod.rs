//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. Every service that acts for a caller asks the
//! access policy before touching a store.

mod auth_service;
pub mod container;
mod credential_service;
mod membership_service;
mod org_service;
mod token_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthResponse, AuthService, Authenticator};
pub use credential_service::{CredentialInput, CredentialManager, CredentialService};
pub use membership_service::{MembershipManager, MembershipService, MembershipTarget};
pub use org_service::{OrgManager, OrgService};
pub use token_service::{Claims, TokenService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
