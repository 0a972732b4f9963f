//! User repository: identity records and their division grants.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::user_division::{self, Entity as UserDivisionEntity};
use crate::domain::{DivisionSet, MembershipChange, MembershipOutcome, NewUser, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by login name
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// List all users ordered by username
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Create a new user. Fails with `Conflict` on a taken username.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Set a user's role under a row lock
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<MembershipOutcome>;

    /// Apply a grant/revoke to a user's divisions under a row lock.
    ///
    /// Concurrent changes to the same user are serialized; nothing is
    /// written when the change turns out to be a no-op.
    async fn apply_membership(
        &self,
        id: Uuid,
        change: MembershipChange,
    ) -> AppResult<MembershipOutcome>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Load the grant set of one user.
async fn load_divisions<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<DivisionSet> {
    let rows = UserDivisionEntity::find()
        .filter(user_division::Column::UserId.eq(user_id))
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|row| row.division_id).collect())
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let Some(model) = UserEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let divisions = load_divisions(&self.db, model.id).await?;
        model.into_domain(divisions).map(Some)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let Some(model) = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let divisions = load_divisions(&self.db, model.id).await?;
        model.into_domain(divisions).map(Some)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await?;

        let mut grants: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in UserDivisionEntity::find().all(&self.db).await? {
            grants.entry(row.user_id).or_default().push(row.division_id);
        }

        models
            .into_iter()
            .map(|model| {
                let divisions = grants
                    .remove(&model.id)
                    .unwrap_or_default()
                    .into_iter()
                    .collect();
                model.into_domain(divisions)
            })
            .collect()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        if self.find_by_username(&new_user.username).await?.is_some() {
            return Err(AppError::conflict("Username"));
        }

        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The unique index still catches a concurrent registration
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, "Username"))?;

        model.into_domain(DivisionSet::new())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<MembershipOutcome> {
        let txn = self.db.begin().await?;

        let model = UserEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("User")?;
        let divisions = load_divisions(&txn, id).await?;
        let mut user = model.clone().into_domain(divisions)?;

        let changed = user.update_role(role);
        if changed {
            let mut active: ActiveModel = model.into();
            active.role = Set(role.to_string());
            active.updated_at = Set(user.updated_at);
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(MembershipOutcome { user, changed })
    }

    async fn apply_membership(
        &self,
        id: Uuid,
        change: MembershipChange,
    ) -> AppResult<MembershipOutcome> {
        let txn = self.db.begin().await?;

        // Row lock on the user serializes concurrent read-modify-write cycles
        let model = UserEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("User")?;
        let divisions = load_divisions(&txn, id).await?;
        let mut user = model.clone().into_domain(divisions)?;

        let delta = user.apply_membership(&change);
        if delta.is_empty() {
            txn.commit().await?;
            return Ok(MembershipOutcome {
                user,
                changed: false,
            });
        }

        if !delta.added.is_empty() {
            UserDivisionEntity::insert_many(delta.added.iter().map(|division_id| {
                user_division::ActiveModel {
                    user_id: Set(id),
                    division_id: Set(*division_id),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }

        if !delta.removed.is_empty() {
            UserDivisionEntity::delete_many()
                .filter(user_division::Column::UserId.eq(id))
                .filter(user_division::Column::DivisionId.is_in(delta.removed.clone()))
                .exec(&txn)
                .await?;
        }

        let mut active: ActiveModel = model.into();
        active.updated_at = Set(user.updated_at);
        active.update(&txn).await?;

        txn.commit().await?;

        tracing::debug!(
            user_id = %id,
            added = delta.added.len(),
            removed = delta.removed.len(),
            "Division grants updated"
        );

        Ok(MembershipOutcome {
            user,
            changed: true,
        })
    }
}
