//! Division entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Division;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "divisions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    /// Containing OU (NULL = not in any OU)
    pub ou_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Division {
    fn from(model: Model) -> Self {
        Division {
            id: model.id,
            name: model.name,
            ou_id: model.ou_id,
            created_at: model.created_at,
        }
    }
}
