//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod credential;
pub mod division;
pub mod org_unit;
pub mod user;
pub mod user_division;
