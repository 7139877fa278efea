use std::sync::Arc;

use serde::Serialize;

use crate::{
    auth::{
        Principal, Role, TokenService,
        gate::require_superadmin,
        password::{hash_password, verify_password},
    },
    clock::Clock,
    db::{dao::AdminDao, entities::admin},
    error::AppError,
    services::bounds::non_blank,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRow {
    pub id: String,
    pub name: String,
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<admin::Model> for AdminRow {
    fn from(model: admin::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminLogin {
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Debug, Clone, Default)]
pub struct UpsertAdmin {
    pub id: String,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Clone)]
pub struct AdminService {
    admins: AdminDao,
    tokens: TokenService,
    clock: Arc<dyn Clock>,
    token_ttl_secs: u64,
}

impl AdminService {
    pub fn new(
        admins: AdminDao,
        tokens: TokenService,
        clock: Arc<dyn Clock>,
        token_ttl_secs: u64,
    ) -> Self {
        Self {
            admins,
            tokens,
            clock,
            token_ttl_secs,
        }
    }

    pub async fn login(&self, id: &str, password: &str) -> Result<AdminLogin, AppError> {
        let Some(model) = self.admins.find(id).await? else {
            tracing::debug!(id, "admin login for unknown id");
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(password, &model.password_hash) {
            tracing::debug!(id, "admin login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let role = admin_role(&model.role)?;
        let token = self
            .tokens
            .issue(&Principal::admin(model.id.clone(), role), self.token_ttl_secs)?;
        Ok(AdminLogin {
            token,
            admin: AdminProfile {
                id: model.id,
                name: model.name,
                role,
            },
        })
    }

    pub async fn list(&self) -> Result<Vec<AdminRow>, AppError> {
        let rows = self.admins.list_ordered().await?;
        Ok(rows.into_iter().map(AdminRow::from).collect())
    }

    /// Superadmin only. `name` defaults to the id, `role` to admin.
    pub async fn upsert(&self, principal: &Principal, input: UpsertAdmin) -> Result<(), AppError> {
        require_superadmin(principal)?;
        let id = non_blank(Some(input.id.as_str()))
            .ok_or_else(|| AppError::bad_request("id required"))?
            .to_string();
        let role = match non_blank(input.role.as_deref()) {
            None => Role::Admin,
            Some(raw) => match Role::try_from(raw) {
                Ok(role @ (Role::Admin | Role::SuperAdmin)) => role,
                _ => return Err(AppError::bad_request("role must be admin or superadmin")),
            },
        };
        let name = non_blank(input.name.as_deref()).unwrap_or(id.as_str()).to_string();
        let password = input.password.filter(|password| !password.is_empty());
        let now = self.clock.now_ms();

        if self.admins.find(&id).await?.is_some() {
            let password_hash = password.as_deref().map(hash_password).transpose()?;
            self.admins
                .overwrite(&id, password_hash, name, role.as_str(), now)
                .await?;
            tracing::info!(id, role = role.as_str(), by = %principal.id, "updated admin");
        } else {
            let password = password
                .ok_or_else(|| AppError::bad_request("password required for a new admin"))?;
            self.admins
                .insert(&id, hash_password(&password)?, name, role.as_str(), now)
                .await?;
            tracing::info!(id, role = role.as_str(), by = %principal.id, "created admin");
        }
        Ok(())
    }

    /// Superadmin only; an admin can never remove itself.
    pub async fn remove(&self, principal: &Principal, id: &str) -> Result<(), AppError> {
        require_superadmin(principal)?;
        let id = non_blank(Some(id)).ok_or_else(|| AppError::bad_request("id required"))?;
        if id == principal.id {
            return Err(AppError::bad_request("cannot remove self"));
        }
        if !self.admins.remove(id).await? {
            return Err(AppError::not_found("admin not found"));
        }
        tracing::info!(id, by = %principal.id, "removed admin");
        Ok(())
    }

    /// Inserts the admin unless the id already exists. Returns whether it did.
    pub async fn seed(
        &self,
        id: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<bool, AppError> {
        if self.admins.find(id).await?.is_some() {
            return Ok(false);
        }
        self.admins
            .insert(
                id,
                hash_password(password)?,
                name.to_string(),
                role.as_str(),
                self.clock.now_ms(),
            )
            .await?;
        Ok(true)
    }
}

fn admin_role(raw: &str) -> Result<Role, AppError> {
    match Role::try_from(raw) {
        Ok(role @ (Role::Admin | Role::SuperAdmin)) => Ok(role),
        _ => Err(AppError::internal(format!("stored admin role is invalid: {raw}"))),
    }
}
