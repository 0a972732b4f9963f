//! Membership service - grants and revokes division access.
//!
//! An OU is only a way of naming several divisions at once: assigning it
//! copies the divisions it contains right now into the user's grant set.
//! Divisions later moved into the OU are not granted.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{authorize, Action, Caller, MembershipChange, MembershipOutcome, Resource};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Who to change and which divisions to name. At least one of
/// `division_id` and `ou_id` must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipTarget {
    pub user_id: Uuid,
    pub division_id: Option<Uuid>,
    pub ou_id: Option<Uuid>,
}

impl MembershipTarget {
    pub fn division(user_id: Uuid, division_id: Uuid) -> Self {
        Self {
            user_id,
            division_id: Some(division_id),
            ou_id: None,
        }
    }

    pub fn ou(user_id: Uuid, ou_id: Uuid) -> Self {
        Self {
            user_id,
            division_id: None,
            ou_id: Some(ou_id),
        }
    }
}

#[async_trait]
pub trait MembershipService: Send + Sync {
    /// Grant the named division and/or every division currently in the named OU.
    async fn assign(&self, caller: &Caller, target: MembershipTarget)
        -> AppResult<MembershipOutcome>;

    /// Revoke the named division and/or every division currently in the named OU.
    async fn unassign(
        &self,
        caller: &Caller,
        target: MembershipTarget,
    ) -> AppResult<MembershipOutcome>;

    async fn assign_division(
        &self,
        caller: &Caller,
        user_id: Uuid,
        division_id: Uuid,
    ) -> AppResult<MembershipOutcome> {
        self.assign(caller, MembershipTarget::division(user_id, division_id))
            .await
    }

    async fn assign_ou(
        &self,
        caller: &Caller,
        user_id: Uuid,
        ou_id: Uuid,
    ) -> AppResult<MembershipOutcome> {
        self.assign(caller, MembershipTarget::ou(user_id, ou_id)).await
    }

    async fn unassign_division(
        &self,
        caller: &Caller,
        user_id: Uuid,
        division_id: Uuid,
    ) -> AppResult<MembershipOutcome> {
        self.unassign(caller, MembershipTarget::division(user_id, division_id))
            .await
    }

    async fn unassign_ou(
        &self,
        caller: &Caller,
        user_id: Uuid,
        ou_id: Uuid,
    ) -> AppResult<MembershipOutcome> {
        self.unassign(caller, MembershipTarget::ou(user_id, ou_id))
            .await
    }
}

pub struct MembershipManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> MembershipManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Target must name something, and the user must exist.
    async fn check_target(&self, target: &MembershipTarget) -> AppResult<()> {
        if target.division_id.is_none() && target.ou_id.is_none() {
            return Err(AppError::validation("Either divisionId or ouId is required"));
        }

        self.uow
            .users()
            .find_by_id(target.user_id)
            .await?
            .ok_or_not_found("User")?;
        Ok(())
    }

    /// Resolve a grant target into the concrete division ids it names.
    ///
    /// Every referenced entity must exist.
    async fn resolve(&self, target: &MembershipTarget) -> AppResult<Vec<Uuid>> {
        self.check_target(target).await?;

        let mut ids = Vec::new();

        if let Some(division_id) = target.division_id {
            let division = self
                .uow
                .org()
                .find_division(division_id)
                .await?
                .ok_or_not_found("Division")?;
            ids.push(division.id);
        }

        if let Some(ou_id) = target.ou_id {
            let ou = self.uow.org().find_ou(ou_id).await?.ok_or_not_found("OU")?;
            let contained = self.uow.org().divisions_in_ou(ou.id).await?;
            ids.extend(contained.into_iter().map(|d| d.id));
        }

        Ok(ids)
    }

    /// Resolve a revoke target without requiring the division or OU to exist.
    ///
    /// An unknown division id simply is not held, and an unknown OU contains
    /// nothing, so both end up as a no-op revoke.
    async fn resolve_for_revoke(&self, target: &MembershipTarget) -> AppResult<Vec<Uuid>> {
        self.check_target(target).await?;

        let mut ids: Vec<Uuid> = target.division_id.into_iter().collect();
        if let Some(ou_id) = target.ou_id {
            let contained = self.uow.org().divisions_in_ou(ou_id).await?;
            ids.extend(contained.into_iter().map(|d| d.id));
        }

        Ok(ids)
    }
}

#[async_trait]
impl<U: UnitOfWork> MembershipService for MembershipManager<U> {
    async fn assign(
        &self,
        caller: &Caller,
        target: MembershipTarget,
    ) -> AppResult<MembershipOutcome> {
        authorize(caller, Action::AssignMembership, Resource::System)?;
        let ids = self.resolve(&target).await?;

        let outcome = self
            .uow
            .users()
            .apply_membership(target.user_id, MembershipChange::Grant(ids))
            .await?;

        tracing::info!(
            admin_id = %caller.id,
            user_id = %target.user_id,
            division_id = ?target.division_id,
            ou_id = ?target.ou_id,
            changed = outcome.changed,
            "User assigned"
        );
        Ok(outcome)
    }

    async fn unassign(
        &self,
        caller: &Caller,
        target: MembershipTarget,
    ) -> AppResult<MembershipOutcome> {
        authorize(caller, Action::UnassignMembership, Resource::System)?;
        let ids = self.resolve_for_revoke(&target).await?;

        let outcome = self
            .uow
            .users()
            .apply_membership(target.user_id, MembershipChange::Revoke(ids))
            .await?;

        tracing::info!(
            admin_id = %caller.id,
            user_id = %target.user_id,
            division_id = ?target.division_id,
            ou_id = ?target.ou_id,
            changed = outcome.changed,
            "User unassigned"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Division, DivisionSet, OrgUnit, User, UserRole};
    use crate::infra::{MockOrgRepository, MockUserRepository};
    use crate::services::test_support::StubUnitOfWork;

    fn admin() -> Caller {
        Caller {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            role: UserRole::Admin,
            divisions: DivisionSet::new(),
        }
    }

    fn bob() -> User {
        User::new(Uuid::new_v4(), "bob".to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_requires_a_target() {
        let service = MembershipManager::new(StubUnitOfWork::empty());
        let target = MembershipTarget {
            user_id: Uuid::new_v4(),
            division_id: None,
            ou_id: None,
        };

        let result = service.assign(&admin(), target).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_non_admin_refused_before_lookup() {
        let service = MembershipManager::new(StubUnitOfWork::empty());
        let mut caller = admin();
        caller.role = UserRole::Management;

        let result = service
            .assign_division(&caller, Uuid::new_v4(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_missing_division_is_not_found() {
        let user = bob();
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_apply_membership().never();
        let mut org = MockOrgRepository::new();
        org.expect_find_division().returning(|_| Ok(None));

        let service = MembershipManager::new(StubUnitOfWork::new(
            users,
            org,
            Default::default(),
        ));

        let result = service
            .assign_division(&admin(), user_id, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(ref e)) if e == "Division"));
    }

    #[tokio::test]
    async fn test_assign_ou_grants_snapshot_of_contained_divisions() {
        let user = bob();
        let user_id = user.id;
        let ou = OrgUnit::new(Uuid::new_v4(), "News Management".to_string());
        let d1 = Division::new(Uuid::new_v4(), "Finance".to_string(), Some(ou.id));
        let d2 = Division::new(Uuid::new_v4(), "IT".to_string(), Some(ou.id));
        let expected = vec![d1.id, d2.id];

        let mut users = MockUserRepository::new();
        let found = user.clone();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users
            .expect_apply_membership()
            .withf(move |id, change| {
                *id == user_id && *change == MembershipChange::Grant(expected.clone())
            })
            .times(1)
            .returning(move |_, change| {
                let mut user = user.clone();
                user.apply_membership(&change);
                Ok(MembershipOutcome {
                    user,
                    changed: true,
                })
            });

        let mut org = MockOrgRepository::new();
        let found_ou = ou.clone();
        org.expect_find_ou()
            .returning(move |_| Ok(Some(found_ou.clone())));
        org.expect_divisions_in_ou()
            .returning(move |_| Ok(vec![d1.clone(), d2.clone()]));

        let service = MembershipManager::new(StubUnitOfWork::new(
            users,
            org,
            Default::default(),
        ));

        let outcome = service.assign_ou(&admin(), user_id, ou.id).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.user.divisions.len(), 2);
    }

    #[tokio::test]
    async fn test_unassign_unknown_division_or_ou_is_a_no_op() {
        let user = bob();
        let user_id = user.id;
        let unknown_division = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        let found = user.clone();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users
            .expect_apply_membership()
            .times(2)
            .returning(move |_, change| {
                let mut user = user.clone();
                let delta = user.apply_membership(&change);
                Ok(MembershipOutcome {
                    user,
                    changed: !delta.is_empty(),
                })
            });

        let mut org = MockOrgRepository::new();
        org.expect_find_division().never();
        org.expect_find_ou().never();
        org.expect_divisions_in_ou().returning(|_| Ok(vec![]));

        let service = MembershipManager::new(StubUnitOfWork::new(
            users,
            org,
            Default::default(),
        ));

        let outcome = service
            .unassign_division(&admin(), user_id, unknown_division)
            .await
            .unwrap();
        assert!(!outcome.changed);

        let outcome = service
            .unassign_ou(&admin(), user_id, Uuid::new_v4())
            .await
            .unwrap();
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn test_unassign_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        users.expect_apply_membership().never();
        let service = MembershipManager::new(StubUnitOfWork::with_users(users));

        let result = service
            .unassign_division(&admin(), Uuid::new_v4(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(ref e)) if e == "User"));
    }
}
