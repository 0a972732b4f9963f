//! User service - profile, user listing and role changes.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{authorize, Action, Caller, ProfileResponse, Resource, User, UserRole};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// The caller's own profile with divisions expanded
    async fn profile(&self, caller: &Caller) -> AppResult<ProfileResponse>;

    /// List every user (admin only)
    async fn list_users(&self, caller: &Caller) -> AppResult<Vec<User>>;

    /// Set a user's role (admin only). Unknown role names are `InvalidRole`.
    async fn change_role(&self, caller: &Caller, user_id: Uuid, new_role: &str)
        -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn profile(&self, caller: &Caller) -> AppResult<ProfileResponse> {
        let user = self
            .uow
            .users()
            .find_by_id(caller.id)
            .await?
            .ok_or_not_found("User")?;
        let divisions = self.uow.org().find_divisions(user.divisions.to_vec()).await?;

        Ok(ProfileResponse::resolve(&user, &divisions))
    }

    async fn list_users(&self, caller: &Caller) -> AppResult<Vec<User>> {
        authorize(caller, Action::ListUsers, Resource::System)?;
        self.uow.users().list().await
    }

    async fn change_role(
        &self,
        caller: &Caller,
        user_id: Uuid,
        new_role: &str,
    ) -> AppResult<User> {
        authorize(caller, Action::ChangeRole, Resource::System)?;
        let role: UserRole = new_role.parse()?;

        let outcome = self.uow.users().update_role(user_id, role).await?;
        if outcome.changed {
            tracing::info!(
                admin_id = %caller.id,
                user_id = %user_id,
                %role,
                "User role changed"
            );
        }

        Ok(outcome.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DivisionSet, MembershipOutcome};
    use crate::errors::AppError;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::StubUnitOfWork;

    fn caller(role: UserRole) -> Caller {
        Caller {
            id: Uuid::new_v4(),
            username: "caller".to_string(),
            role,
            divisions: DivisionSet::new(),
        }
    }

    #[tokio::test]
    async fn test_non_admin_cannot_change_role() {
        // The store must never be reached
        let mut users = MockUserRepository::new();
        users.expect_update_role().never();
        let service = UserManager::new(StubUnitOfWork::with_users(users));

        for role in [UserRole::User, UserRole::Management] {
            let result = service
                .change_role(&caller(role), Uuid::new_v4(), "admin")
                .await;
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }
    }

    #[tokio::test]
    async fn test_invalid_role_rejected() {
        let mut users = MockUserRepository::new();
        users.expect_update_role().never();
        let service = UserManager::new(StubUnitOfWork::with_users(users));

        let result = service
            .change_role(&caller(UserRole::Admin), Uuid::new_v4(), "superuser")
            .await;
        assert!(matches!(result, Err(AppError::InvalidRole(_))));
    }

    #[tokio::test]
    async fn test_admin_changes_role() {
        let target = User::new(Uuid::new_v4(), "bob".to_string(), "hash".to_string());
        let target_id = target.id;

        let mut users = MockUserRepository::new();
        users
            .expect_update_role()
            .withf(move |id, role| *id == target_id && *role == UserRole::Management)
            .times(1)
            .returning(move |_, role| {
                let mut user = target.clone();
                user.update_role(role);
                Ok(MembershipOutcome {
                    user,
                    changed: true,
                })
            });
        let service = UserManager::new(StubUnitOfWork::with_users(users));

        let user = service
            .change_role(&caller(UserRole::Admin), target_id, "management")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Management);
    }

    #[tokio::test]
    async fn test_list_users_admin_only() {
        let mut users = MockUserRepository::new();
        users.expect_list().times(1).returning(|| Ok(vec![]));
        let service = UserManager::new(StubUnitOfWork::with_users(users));

        assert!(matches!(
            service.list_users(&caller(UserRole::Management)).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(service
            .list_users(&caller(UserRole::Admin))
            .await
            .unwrap()
            .is_empty());
    }
}
