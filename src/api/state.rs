//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::UnitOfWork;
use crate::services::{
    AuthService, CredentialService, MembershipService, OrgService, ServiceContainer, Services,
    TokenService, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and bearer resolution
    pub auth_service: Arc<dyn AuthService>,
    /// Profiles, user listing and role changes
    pub user_service: Arc<dyn UserService>,
    /// Division grants
    pub membership_service: Arc<dyn MembershipService>,
    /// OUs and divisions
    pub org_service: Arc<dyn OrgService>,
    /// Division-scoped credentials
    pub credential_service: Arc<dyn CredentialService>,
    /// Store handle used by the health probe
    pub store: Arc<dyn UnitOfWork>,
}

impl AppState {
    /// Build every service over `uow`.
    pub fn from_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, tokens: TokenService) -> Self {
        let container = Services::new(uow.clone(), tokens);
        Self::new(&container, uow)
    }

    /// Create application state from an existing service container.
    pub fn new(container: &dyn ServiceContainer, store: Arc<dyn UnitOfWork>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            membership_service: container.membership(),
            org_service: container.org(),
            credential_service: container.credentials(),
            store,
        }
    }
}
