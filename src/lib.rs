//! Credential Vault - division-scoped credential sharing API
//!
//! Users belong to divisions, divisions sit inside organizational units
//! (OUs), and credentials are stored per division. Every protected call
//! goes through one access policy keyed on the caller's role and grants.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, membership rules and the access policy
//! - **services**: Application use cases
//! - **infra**: Database, migrations and repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response envelopes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the sample OUs and an admin
//! cargo run -- seed --admin-password adminpass123
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Caller, Password, User, UserRole};
pub use errors::{AppError, AppResult};
