//! Organizational unit entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::OrgUnit;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "org_units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OrgUnit {
    fn from(model: Model) -> Self {
        OrgUnit {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}
