//! Credential repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::credential::{self, Entity as CredentialEntity};
use crate::domain::{Credential, NewCredential};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Credential store. Every record is scoped to exactly one division.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Credentials owned by one division
    async fn list_by_division(&self, division_id: Uuid) -> AppResult<Vec<Credential>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>>;

    async fn create(&self, credential: NewCredential) -> AppResult<Credential>;

    /// Persist name, username and secret. The owning division is never written.
    async fn update(&self, credential: Credential) -> AppResult<Credential>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CredentialRepository
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for CredentialStore {
    async fn list_by_division(&self, division_id: Uuid) -> AppResult<Vec<Credential>> {
        let models = CredentialEntity::find()
            .filter(credential::Column::DivisionId.eq(division_id))
            .order_by_asc(credential::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Credential::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>> {
        let result = CredentialEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Credential::from))
    }

    async fn create(&self, new_credential: NewCredential) -> AppResult<Credential> {
        let fresh = Credential::new(
            Uuid::new_v4(),
            new_credential.division_id,
            new_credential.name,
            new_credential.username,
            new_credential.secret,
        );

        let model = credential::ActiveModel {
            id: Set(fresh.id),
            division_id: Set(fresh.division_id()),
            name: Set(fresh.name),
            username: Set(fresh.username),
            secret: Set(fresh.secret),
            created_at: Set(fresh.created_at),
            updated_at: Set(fresh.updated_at),
        }
        .insert(&self.db)
        .await?;

        Ok(Credential::from(model))
    }

    async fn update(&self, updated: Credential) -> AppResult<Credential> {
        let active = credential::ActiveModel {
            id: ActiveValue::Unchanged(updated.id),
            name: Set(updated.name),
            username: Set(updated.username),
            secret: Set(updated.secret),
            updated_at: Set(updated.updated_at),
            ..Default::default()
        };

        match active.update(&self.db).await {
            Ok(model) => Ok(Credential::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Credential")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CredentialEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Credential"));
        }

        Ok(())
    }
}
