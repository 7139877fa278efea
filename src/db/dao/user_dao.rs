use std::cmp;

use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub password_hash: String,
    pub display_name: String,
    pub uses_left: i64,
    pub unlimited: bool,
    pub disabled: bool,
    pub created_by_admin_id: Option<String>,
}

/// Fields an admin may overwrite on an existing user. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
    pub uses_left: Option<i64>,
    pub unlimited: Option<bool>,
    pub disabled: Option<bool>,
}

impl UserDao {
    pub async fn find(&self, id: &str) -> DaoResult<Option<user::Model>> {
        self.find_by_key(id.to_string()).await
    }

    /// `owner = None` lists everything; otherwise only rows created by that admin.
    pub async fn list_visible(&self, owner: Option<&str>) -> DaoResult<Vec<user::Model>> {
        let owner = owner.map(str::to_string);
        self.list(move |query| match owner {
            Some(owner) => query.filter(user::Column::CreatedByAdminId.eq(owner)),
            None => query,
        })
        .await
    }

    pub async fn insert(&self, new_user: NewUser, now_ms: i64) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            id: Set(new_user.id),
            password_hash: Set(new_user.password_hash),
            display_name: Set(new_user.display_name),
            role: Set("user".to_string()),
            uses_left: Set(cmp::max(new_user.uses_left, 0)),
            unlimited: Set(new_user.unlimited),
            disabled: Set(new_user.disabled),
            cycle_end_at: Set(0),
            created_by_admin_id: Set(new_user.created_by_admin_id),
            ..Default::default()
        };
        self.create(model, now_ms).await
    }

    pub async fn apply_patch(
        &self,
        id: &str,
        patch: UserPatch,
        now_ms: i64,
    ) -> DaoResult<user::Model> {
        self.update(id.to_string(), now_ms, move |active| {
            if let Some(hash) = patch.password_hash {
                active.password_hash = Set(hash);
            }
            if let Some(display_name) = patch.display_name {
                active.display_name = Set(display_name);
            }
            if let Some(uses_left) = patch.uses_left {
                active.uses_left = Set(cmp::max(uses_left, 0));
            }
            if let Some(unlimited) = patch.unlimited {
                active.unlimited = Set(unlimited);
            }
            if let Some(disabled) = patch.disabled {
                active.disabled = Set(disabled);
            }
        })
        .await
    }

    /// Atomic `uses_left = uses_left + n`; false when the user does not exist.
    pub async fn add_uses(&self, id: &str, n: i64, now_ms: i64) -> DaoResult<bool> {
        let result = User::update_many()
            .col_expr(
                user::Column::UsesLeft,
                Expr::col(user::Column::UsesLeft).add(n),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(now_ms))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn set_unlimited(&self, id: &str, unlimited: bool, now_ms: i64) -> DaoResult<bool> {
        let result = User::update_many()
            .col_expr(user::Column::Unlimited, Expr::value(unlimited))
            .col_expr(user::Column::UpdatedAt, Expr::value(now_ms))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    /// Decrements one use and renews the cycle in a single conditional
    /// statement. Matches nothing (returns false) unless the row is enabled,
    /// limited and still has a use left.
    pub async fn consume_limited_use(
        &self,
        id: &str,
        cycle_end_at: i64,
        now_ms: i64,
    ) -> DaoResult<bool> {
        let result = User::update_many()
            .col_expr(
                user::Column::UsesLeft,
                Expr::col(user::Column::UsesLeft).sub(1),
            )
            .col_expr(user::Column::CycleEndAt, Expr::value(cycle_end_at))
            .col_expr(user::Column::UpdatedAt, Expr::value(now_ms))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Disabled.eq(false))
            .filter(user::Column::Unlimited.eq(false))
            .filter(user::Column::UsesLeft.gt(0))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    /// Renews the cycle of an enabled unlimited user without touching `uses_left`.
    pub async fn renew_unlimited_cycle(
        &self,
        id: &str,
        cycle_end_at: i64,
        now_ms: i64,
    ) -> DaoResult<bool> {
        let result = User::update_many()
            .col_expr(user::Column::CycleEndAt, Expr::value(cycle_end_at))
            .col_expr(user::Column::UpdatedAt, Expr::value(now_ms))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Disabled.eq(false))
            .filter(user::Column::Unlimited.eq(true))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, id: &str) -> DaoResult<bool> {
        self.delete(id.to_string()).await
    }
}
