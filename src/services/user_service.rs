use std::sync::Arc;

use serde::Serialize;

use crate::{
    auth::{
        Principal,
        gate::{check_ownership, listing_scope},
        password::hash_password,
    },
    clock::Clock,
    db::{
        dao::{NewUser, UserDao, UserPatch},
        entities::user,
    },
    error::AppError,
    services::{
        bounds::{clamp_or, non_blank},
        session_service::normalize_epoch_ms,
    },
};

pub const MAX_USES_LEFT: i64 = 999_999;
pub const MAX_USES_PER_GRANT: i64 = 100_000;

/// Admin-side view of a user row; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub display_name: String,
    pub role: String,
    pub uses_left: i64,
    pub unlimited: bool,
    pub disabled: bool,
    pub cycle_end_at: i64,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<user::Model> for UserRow {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            display_name: model.display_name,
            role: model.role,
            uses_left: model.uses_left.max(0),
            unlimited: model.unlimited,
            disabled: model.disabled,
            cycle_end_at: normalize_epoch_ms(model.cycle_end_at),
            created_by: model.created_by_admin_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpsertUser {
    pub id: String,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub uses_left: Option<i64>,
    pub unlimited: Option<bool>,
    pub disabled: Option<bool>,
    pub role: Option<String>,
}

/// Admin management of end users, scoped by ownership.
#[derive(Clone)]
pub struct UserService {
    users: UserDao,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(users: UserDao, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    pub async fn list(&self, principal: &Principal) -> Result<Vec<UserRow>, AppError> {
        let rows = self.users.list_visible(listing_scope(principal)).await?;
        Ok(rows.into_iter().map(UserRow::from).collect())
    }

    /// Creates the user (owned by the caller) or updates only the provided fields.
    pub async fn upsert(&self, principal: &Principal, input: UpsertUser) -> Result<(), AppError> {
        let id = non_blank(Some(input.id.as_str()))
            .ok_or_else(|| AppError::bad_request("id required"))?
            .to_string();
        if let Some(role) = input.role.as_deref() {
            if role.trim() != "user" {
                return Err(AppError::bad_request("role must be \"user\""));
            }
        }
        let uses_left = input.uses_left.map(|uses| uses.clamp(0, MAX_USES_LEFT));
        let display_name = non_blank(input.display_name.as_deref()).map(str::to_string);
        let password = input.password.filter(|password| !password.is_empty());
        let now = self.clock.now_ms();

        match self.users.find(&id).await? {
            Some(existing) => {
                check_ownership(principal, &existing)?;
                let password_hash = password.as_deref().map(hash_password).transpose()?;
                let patch = UserPatch {
                    password_hash,
                    display_name,
                    uses_left,
                    unlimited: input.unlimited,
                    disabled: input.disabled,
                };
                self.users.apply_patch(&id, patch, now).await?;
                tracing::info!(id, by = %principal.id, "updated user");
            }
            None => {
                let password = password.ok_or_else(|| {
                    AppError::bad_request("password required for a new user")
                })?;
                let display_name = display_name.ok_or_else(|| {
                    AppError::bad_request("displayName required for a new user")
                })?;
                let new_user = NewUser {
                    id: id.clone(),
                    password_hash: hash_password(&password)?,
                    display_name,
                    uses_left: uses_left.unwrap_or(0),
                    unlimited: input.unlimited.unwrap_or(false),
                    disabled: input.disabled.unwrap_or(false),
                    created_by_admin_id: Some(principal.id.clone()),
                };
                self.users.insert(new_user, now).await?;
                tracing::info!(id, by = %principal.id, "created user");
            }
        }
        Ok(())
    }

    pub async fn remove(&self, principal: &Principal, id: &str) -> Result<(), AppError> {
        let target = self.owned_target(principal, id).await?;
        if !self.users.remove(&target.id).await? {
            return Err(AppError::not_found("user not found"));
        }
        tracing::info!(id = %target.id, by = %principal.id, "removed user");
        Ok(())
    }

    pub async fn add_uses(
        &self,
        principal: &Principal,
        id: &str,
        n: Option<i64>,
    ) -> Result<(), AppError> {
        let target = self.owned_target(principal, id).await?;
        let n = clamp_or(n, 1, MAX_USES_PER_GRANT, 1);
        if !self
            .users
            .add_uses(&target.id, n, self.clock.now_ms())
            .await?
        {
            return Err(AppError::not_found("user not found"));
        }
        tracing::info!(id = %target.id, n, by = %principal.id, "added uses");
        Ok(())
    }

    pub async fn set_unlimited(
        &self,
        principal: &Principal,
        id: &str,
        unlimited: bool,
    ) -> Result<(), AppError> {
        let target = self.owned_target(principal, id).await?;
        if !self
            .users
            .set_unlimited(&target.id, unlimited, self.clock.now_ms())
            .await?
        {
            return Err(AppError::not_found("user not found"));
        }
        tracing::info!(id = %target.id, unlimited, by = %principal.id, "set unlimited");
        Ok(())
    }

    async fn owned_target(&self, principal: &Principal, id: &str) -> Result<user::Model, AppError> {
        let id = non_blank(Some(id)).ok_or_else(|| AppError::bad_request("id required"))?;
        let target = self
            .users
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))?;
        check_ownership(principal, &target)?;
        Ok(target)
    }
}
