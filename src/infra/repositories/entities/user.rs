//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{DivisionSet, User, UserRole};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Combine the row with its grant rows into a domain entity.
    pub fn into_domain(self, divisions: DivisionSet) -> AppResult<User> {
        let role: UserRole = self
            .role
            .parse()
            .map_err(|_| AppError::internal(format!("Unknown role stored for user {}", self.id)))?;
        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            role,
            divisions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
