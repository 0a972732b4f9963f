//! Org hierarchy repository: OUs and divisions.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::division::{self, Entity as DivisionEntity};
use super::entities::org_unit::{self, Entity as OrgUnitEntity};
use crate::domain::{Division, OrgUnit};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// OU and division store.
///
/// Name uniqueness for both OUs and divisions is enforced here.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrgRepository: Send + Sync {
    async fn find_ou(&self, id: Uuid) -> AppResult<Option<OrgUnit>>;

    async fn find_ou_by_name(&self, name: &str) -> AppResult<Option<OrgUnit>>;

    async fn list_ous(&self) -> AppResult<Vec<OrgUnit>>;

    /// Create an OU. Fails with `Conflict` on a taken name.
    async fn create_ou(&self, name: String) -> AppResult<OrgUnit>;

    async fn find_division(&self, id: Uuid) -> AppResult<Option<Division>>;

    async fn find_division_by_name(&self, name: &str) -> AppResult<Option<Division>>;

    async fn list_divisions(&self) -> AppResult<Vec<Division>>;

    /// Divisions currently contained in an OU
    async fn divisions_in_ou(&self, ou_id: Uuid) -> AppResult<Vec<Division>>;

    /// Divisions matching any of the given ids (missing ids are skipped)
    async fn find_divisions(&self, ids: Vec<Uuid>) -> AppResult<Vec<Division>>;

    /// Create a division, optionally inside an OU. Fails with `Conflict` on a taken name.
    async fn create_division(&self, name: String, ou_id: Option<Uuid>) -> AppResult<Division>;

    /// Move a division into an OU, or out of any OU with `None`.
    async fn set_division_ou(&self, division_id: Uuid, ou_id: Option<Uuid>)
        -> AppResult<Division>;
}

/// Concrete implementation of OrgRepository
pub struct OrgStore {
    db: DatabaseConnection,
}

impl OrgStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrgRepository for OrgStore {
    async fn find_ou(&self, id: Uuid) -> AppResult<Option<OrgUnit>> {
        let result = OrgUnitEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(OrgUnit::from))
    }

    async fn find_ou_by_name(&self, name: &str) -> AppResult<Option<OrgUnit>> {
        let result = OrgUnitEntity::find()
            .filter(org_unit::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(OrgUnit::from))
    }

    async fn list_ous(&self) -> AppResult<Vec<OrgUnit>> {
        let models = OrgUnitEntity::find()
            .order_by_asc(org_unit::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(OrgUnit::from).collect())
    }

    async fn create_ou(&self, name: String) -> AppResult<OrgUnit> {
        if self.find_ou_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("OU"));
        }

        let model = org_unit::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_db_unique(e, "OU"))?;

        Ok(OrgUnit::from(model))
    }

    async fn find_division(&self, id: Uuid) -> AppResult<Option<Division>> {
        let result = DivisionEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Division::from))
    }

    async fn find_division_by_name(&self, name: &str) -> AppResult<Option<Division>> {
        let result = DivisionEntity::find()
            .filter(division::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Division::from))
    }

    async fn list_divisions(&self) -> AppResult<Vec<Division>> {
        let models = DivisionEntity::find()
            .order_by_asc(division::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Division::from).collect())
    }

    async fn divisions_in_ou(&self, ou_id: Uuid) -> AppResult<Vec<Division>> {
        let models = DivisionEntity::find()
            .filter(division::Column::OuId.eq(ou_id))
            .order_by_asc(division::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Division::from).collect())
    }

    async fn find_divisions(&self, ids: Vec<Uuid>) -> AppResult<Vec<Division>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = DivisionEntity::find()
            .filter(division::Column::Id.is_in(ids))
            .order_by_asc(division::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Division::from).collect())
    }

    async fn create_division(&self, name: String, ou_id: Option<Uuid>) -> AppResult<Division> {
        if self.find_division_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Division"));
        }

        let model = division::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            ou_id: Set(ou_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_db_unique(e, "Division"))?;

        Ok(Division::from(model))
    }

    async fn set_division_ou(
        &self,
        division_id: Uuid,
        ou_id: Option<Uuid>,
    ) -> AppResult<Division> {
        let model = DivisionEntity::find_by_id(division_id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Division")?;

        if model.ou_id == ou_id {
            return Ok(Division::from(model));
        }

        let mut active: division::ActiveModel = model.into();
        active.ou_id = Set(ou_id);
        let model = active.update(&self.db).await?;

        Ok(Division::from(model))
    }
}
