//! Credential service - division-scoped credential repository access.
//!
//! Each operation first confirms the division (and, for update and delete,
//! the credential) exists, then asks the access policy, then touches the
//! store. A credential addressed through a division it does not belong to is
//! reported as not found.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    authorize, Action, Caller, Credential, CredentialPatch, NewCredential, Resource,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Fields for a new credential.
#[derive(Debug, Clone)]
pub struct CredentialInput {
    pub name: String,
    pub username: String,
    pub password: String,
}

#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn list(&self, caller: &Caller, division_id: Uuid) -> AppResult<Vec<Credential>>;

    async fn create(
        &self,
        caller: &Caller,
        division_id: Uuid,
        input: CredentialInput,
    ) -> AppResult<Credential>;

    /// Partial update. The owning division never changes.
    async fn update(
        &self,
        caller: &Caller,
        division_id: Uuid,
        credential_id: Uuid,
        patch: CredentialPatch,
    ) -> AppResult<Credential>;

    async fn delete(&self, caller: &Caller, division_id: Uuid, credential_id: Uuid)
        -> AppResult<()>;
}

pub struct CredentialManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CredentialManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_division(&self, division_id: Uuid) -> AppResult<()> {
        self.uow
            .org()
            .find_division(division_id)
            .await?
            .ok_or_not_found("Division")?;
        Ok(())
    }

    /// Existence check, then policy check, for one division.
    async fn guard(&self, caller: &Caller, action: Action, division_id: Uuid) -> AppResult<()> {
        self.ensure_division(division_id).await?;
        authorize(caller, action, Resource::Division(division_id))
    }

    /// Division and credential must both exist before the policy is asked.
    async fn guard_credential(
        &self,
        caller: &Caller,
        action: Action,
        division_id: Uuid,
        credential_id: Uuid,
    ) -> AppResult<Credential> {
        self.ensure_division(division_id).await?;
        let credential = self.find_in_division(division_id, credential_id).await?;
        authorize(caller, action, Resource::Division(division_id))?;
        Ok(credential)
    }

    async fn find_in_division(
        &self,
        division_id: Uuid,
        credential_id: Uuid,
    ) -> AppResult<Credential> {
        self.uow
            .credentials()
            .find_by_id(credential_id)
            .await?
            .filter(|c| c.belongs_to(&division_id))
            .ok_or_not_found("Credential")
    }
}

#[async_trait]
impl<U: UnitOfWork> CredentialService for CredentialManager<U> {
    async fn list(&self, caller: &Caller, division_id: Uuid) -> AppResult<Vec<Credential>> {
        self.guard(caller, Action::ViewCredentials, division_id).await?;
        self.uow.credentials().list_by_division(division_id).await
    }

    async fn create(
        &self,
        caller: &Caller,
        division_id: Uuid,
        input: CredentialInput,
    ) -> AppResult<Credential> {
        self.guard(caller, Action::CreateCredential, division_id).await?;

        let credential = self
            .uow
            .credentials()
            .create(NewCredential {
                division_id,
                name: input.name,
                username: input.username,
                secret: input.password,
            })
            .await?;

        tracing::info!(
            user_id = %caller.id,
            division_id = %division_id,
            credential_id = %credential.id,
            "Credential created"
        );
        Ok(credential)
    }

    async fn update(
        &self,
        caller: &Caller,
        division_id: Uuid,
        credential_id: Uuid,
        patch: CredentialPatch,
    ) -> AppResult<Credential> {
        let mut credential = self
            .guard_credential(caller, Action::UpdateCredential, division_id, credential_id)
            .await?;
        if !credential.apply(&patch) {
            return Ok(credential);
        }

        let updated = self.uow.credentials().update(credential).await?;

        tracing::info!(
            user_id = %caller.id,
            division_id = %division_id,
            credential_id = %credential_id,
            "Credential updated"
        );
        Ok(updated)
    }

    async fn delete(
        &self,
        caller: &Caller,
        division_id: Uuid,
        credential_id: Uuid,
    ) -> AppResult<()> {
        self.guard_credential(caller, Action::DeleteCredential, division_id, credential_id)
            .await?;

        self.uow.credentials().delete(credential_id).await?;

        tracing::info!(
            user_id = %caller.id,
            division_id = %division_id,
            credential_id = %credential_id,
            "Credential deleted"
        );
        Ok(())
    }
}
