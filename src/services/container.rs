//! Service Container - Centralized service access.
//!
//! Builds every service over one shared Unit of Work so handlers can be
//! wired from a single place, whatever backs the stores.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CredentialManager, CredentialService, MembershipManager,
    MembershipService, OrgManager, OrgService, TokenService, UserManager, UserService,
};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn membership(&self) -> Arc<dyn MembershipService>;

    fn org(&self) -> Arc<dyn OrgService>;

    fn credentials(&self) -> Arc<dyn CredentialService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    membership_service: Arc<dyn MembershipService>,
    org_service: Arc<dyn OrgService>,
    credential_service: Arc<dyn CredentialService>,
}

impl Services {
    /// Create a service container with all services sharing `uow`.
    pub fn new<U: UnitOfWork + 'static>(uow: Arc<U>, tokens: TokenService) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), tokens)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            membership_service: Arc::new(MembershipManager::new(uow.clone())),
            org_service: Arc::new(OrgManager::new(uow.clone())),
            credential_service: Arc::new(CredentialManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn membership(&self) -> Arc<dyn MembershipService> {
        self.membership_service.clone()
    }

    fn org(&self) -> Arc<dyn OrgService> {
        self.org_service.clone()
    }

    fn credentials(&self) -> Arc<dyn CredentialService> {
        self.credential_service.clone()
    }
}
