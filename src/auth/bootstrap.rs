use crate::{config::AuthConfig, services::ServiceContext};

use super::Role;

/// Creates the configured superadmin and admin unless their ids already exist.
pub async fn seed_admins(cfg: &AuthConfig, services: &ServiceContext) -> anyhow::Result<()> {
    let admins = services.admins();
    let seeds = [
        (
            cfg.superadmin_id.trim(),
            cfg.superadmin_password.as_str(),
            "Super Admin",
            Role::SuperAdmin,
        ),
        (
            cfg.admin_id.trim(),
            cfg.admin_password.as_str(),
            "Admin #1",
            Role::Admin,
        ),
    ];

    for (id, password, name, role) in seeds {
        if admins.seed(id, password, name, role).await? {
            tracing::info!(id, role = role.as_str(), "seeded admin");
        } else {
            tracing::info!(id, "admin already present");
        }
    }
    Ok(())
}
