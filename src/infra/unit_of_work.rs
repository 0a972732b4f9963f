//! Unit of Work: one handle over every store.
//!
//! Services receive an `Arc<dyn UnitOfWork>` and pull the repository they
//! need from it. Multi-row writes that must be atomic (membership and role
//! changes) open their own transaction inside the repository.

use std::sync::Arc;

use async_trait::async_trait;

use super::db::Database;
use super::repositories::{
    CredentialRepository, CredentialStore, OrgRepository, OrgStore, UserRepository, UserStore,
};
use crate::errors::AppResult;

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Identity store
    fn users(&self) -> Arc<dyn UserRepository>;

    /// OU and division store
    fn org(&self) -> Arc<dyn OrgRepository>;

    /// Credential store
    fn credentials(&self) -> Arc<dyn CredentialRepository>;

    /// Check the backing store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// Database-backed UnitOfWork
pub struct Persistence {
    db: Database,
    users: Arc<UserStore>,
    org: Arc<OrgStore>,
    credentials: Arc<CredentialStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Database) -> Self {
        let conn = db.get_connection();
        Self {
            users: Arc::new(UserStore::new(conn.clone())),
            org: Arc::new(OrgStore::new(conn.clone())),
            credentials: Arc::new(CredentialStore::new(conn)),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
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
        self.db.ping().await?;
        Ok(())
    }
}
