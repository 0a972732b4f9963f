//! Org service - OU and division listing and administration.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    authorize, Action, Caller, Division, DivisionResponse, OrgUnit, OrgUnitResponse, Resource,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait OrgService: Send + Sync {
    /// All divisions with their OU resolved
    async fn list_divisions(&self, caller: &Caller) -> AppResult<Vec<DivisionResponse>>;

    /// All OUs with the divisions they contain
    async fn list_ous(&self, caller: &Caller) -> AppResult<Vec<OrgUnitResponse>>;

    async fn create_ou(&self, caller: &Caller, name: String) -> AppResult<OrgUnitResponse>;

    async fn create_division(
        &self,
        caller: &Caller,
        name: String,
        ou_id: Option<Uuid>,
    ) -> AppResult<DivisionResponse>;

    /// Move a division into `ou_id`, or out of its OU with `None`.
    ///
    /// Existing user grants are untouched either way.
    async fn move_division(
        &self,
        caller: &Caller,
        division_id: Uuid,
        ou_id: Option<Uuid>,
    ) -> AppResult<DivisionResponse>;
}

pub struct OrgManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrgManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Look up the OU a division is about to be placed in, if any.
    async fn target_ou(&self, ou_id: Option<Uuid>) -> AppResult<Option<OrgUnit>> {
        match ou_id {
            Some(ou_id) => {
                let ou = self.uow.org().find_ou(ou_id).await?.ok_or_not_found("OU")?;
                Ok(Some(ou))
            }
            None => Ok(None),
        }
    }

    fn describe(division: &Division, ou: Option<OrgUnit>) -> DivisionResponse {
        DivisionResponse::resolve(division, &ou.into_iter().collect::<Vec<_>>())
    }
}

#[async_trait]
impl<U: UnitOfWork> OrgService for OrgManager<U> {
    async fn list_divisions(&self, caller: &Caller) -> AppResult<Vec<DivisionResponse>> {
        authorize(caller, Action::ViewOrgStructure, Resource::System)?;

        let org = self.uow.org();
        let divisions = org.list_divisions().await?;
        let ous = org.list_ous().await?;

        Ok(divisions
            .iter()
            .map(|d| DivisionResponse::resolve(d, &ous))
            .collect())
    }

    async fn list_ous(&self, caller: &Caller) -> AppResult<Vec<OrgUnitResponse>> {
        authorize(caller, Action::ViewOrgStructure, Resource::System)?;

        let org = self.uow.org();
        let ous = org.list_ous().await?;
        let divisions = org.list_divisions().await?;

        Ok(ous
            .iter()
            .map(|ou| OrgUnitResponse::resolve(ou, &divisions))
            .collect())
    }

    async fn create_ou(&self, caller: &Caller, name: String) -> AppResult<OrgUnitResponse> {
        authorize(caller, Action::ManageOrgStructure, Resource::System)?;

        let ou = self.uow.org().create_ou(name).await?;
        tracing::info!(ou_id = %ou.id, name = %ou.name, "OU created");
        Ok(OrgUnitResponse::resolve(&ou, &[]))
    }

    async fn create_division(
        &self,
        caller: &Caller,
        name: String,
        ou_id: Option<Uuid>,
    ) -> AppResult<DivisionResponse> {
        authorize(caller, Action::ManageOrgStructure, Resource::System)?;
        let ou = self.target_ou(ou_id).await?;

        let division = self.uow.org().create_division(name, ou_id).await?;
        tracing::info!(
            division_id = %division.id,
            ou_id = ?division.ou_id,
            name = %division.name,
            "Division created"
        );
        Ok(Self::describe(&division, ou))
    }

    async fn move_division(
        &self,
        caller: &Caller,
        division_id: Uuid,
        ou_id: Option<Uuid>,
    ) -> AppResult<DivisionResponse> {
        authorize(caller, Action::ManageOrgStructure, Resource::System)?;
        let ou = self.target_ou(ou_id).await?;

        let division = self.uow.org().set_division_ou(division_id, ou_id).await?;
        tracing::info!(division_id = %division.id, ou_id = ?division.ou_id, "Division moved");
        Ok(Self::describe(&division, ou))
    }
}
