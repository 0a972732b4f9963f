//! Unit of Work over mockall repositories, for service unit tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::infra::{
    CredentialRepository, MockCredentialRepository, MockOrgRepository, MockUserRepository,
    OrgRepository, UnitOfWork, UserRepository,
};

pub struct StubUnitOfWork {
    users: Arc<MockUserRepository>,
    org: Arc<MockOrgRepository>,
    credentials: Arc<MockCredentialRepository>,
}

impl StubUnitOfWork {
    pub fn new(
        users: MockUserRepository,
        org: MockOrgRepository,
        credentials: MockCredentialRepository,
    ) -> Arc<Self> {
        Arc::new(Self {
            users: Arc::new(users),
            org: Arc::new(org),
            credentials: Arc::new(credentials),
        })
    }

    /// No expectations anywhere: any store access fails the test.
    pub fn empty() -> Arc<Self> {
        Self::new(
            MockUserRepository::new(),
            MockOrgRepository::new(),
            MockCredentialRepository::new(),
        )
    }

    pub fn with_users(users: MockUserRepository) -> Arc<Self> {
        Self::new(users, MockOrgRepository::new(), MockCredentialRepository::new())
    }

    pub fn with_org(org: MockOrgRepository) -> Arc<Self> {
        Self::new(MockUserRepository::new(), org, MockCredentialRepository::new())
    }
}

#[async_trait]
impl UnitOfWork for StubUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn org(&self) -> Arc<dyn OrgRepository> {
        self.org.clone()
    }

    fn credentials(&self) -> Arc<dyn CredentialRepository> {
        self.credentials.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
