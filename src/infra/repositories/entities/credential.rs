//! Credential entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Credential;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub division_id: Uuid,
    pub name: String,
    pub username: String,
    pub secret: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Credential {
    fn from(model: Model) -> Self {
        Credential {
            id: model.id,
            division_id: model.division_id,
            name: model.name,
            username: model.username,
            secret: model.secret,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
