use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    let database = &cfg.database;
    if database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }
    if database.max_connections == 0 {
        errors.push("database.max_connections must be > 0".to_string());
    }
    if database.min_idle > database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            database.min_idle, database.max_connections
        ));
    }

    let auth = &cfg.auth;
    if auth.jwt_secret.trim().is_empty() {
        errors.push("auth.jwt_secret must not be empty".to_string());
    }
    for (key, value) in [
        ("auth.superadmin_id", &auth.superadmin_id),
        ("auth.superadmin_password", &auth.superadmin_password),
        ("auth.admin_id", &auth.admin_id),
        ("auth.admin_password", &auth.admin_password),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("{key} must not be empty"));
        }
    }
    if auth.superadmin_id.trim() == auth.admin_id.trim() {
        errors.push("auth.superadmin_id and auth.admin_id must differ".to_string());
    }
    if auth.admin_token_ttl_secs == 0 {
        errors.push("auth.admin_token_ttl_secs must be > 0".to_string());
    }
    if auth.user_token_ttl_secs == 0 {
        errors.push("auth.user_token_ttl_secs must be > 0".to_string());
    }

    if cfg.cors.origins().is_empty() {
        errors.push("cors.allow_origins must list at least one origin or `*`".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
