//! HTTP request handlers.

pub mod admin_handler;
pub mod auth_handler;
pub mod credential_handler;
pub mod org_handler;
pub mod user_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use credential_handler::credential_routes;
pub use org_handler::org_routes;
pub use user_handler::user_routes;
