//! Infrastructure layer - External systems integration
//!
//! Database connection, migrations, repositories and the Unit of Work
//! that hands them to services.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CredentialRepository, CredentialStore, OrgRepository, OrgStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockCredentialRepository, MockOrgRepository, MockUserRepository};
