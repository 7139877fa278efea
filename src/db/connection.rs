use std::time::Duration;

use anyhow::{Result, bail};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;
const ENTITY_REGISTRY: &str = "entitlement_server::db::entities::*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim().to_ascii_lowercase();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else {
            bail!(
                "unsupported database url '{}'; expected postgres://, postgresql:// or sqlite:",
                redact_url(&url)
            )
        }
    }
}

/// Opens the pool, applies per-backend session settings and syncs the schema
/// from the entity registry.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let backend = Backend::from_url(&cfg.url)?;

    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if backend == Backend::Sqlite {
        // applied by sqlx to every connection the pool opens
        options.map_sqlx_sqlite_opts(|opts| {
            opts.foreign_keys(true)
                .busy_timeout(Duration::from_millis(SQLITE_BUSY_TIMEOUT_MS))
        });
    }

    let db = Database::connect(options).await?;

    info!(backend = ?backend, url = %redact_url(&cfg.url), "syncing database schema from entities");
    db.get_schema_registry(ENTITY_REGISTRY).sync(&db).await?;
    Ok(db)
}

fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, rest)) = trimmed.split_once("://") {
        match rest.rsplit_once('@') {
            Some((_, host)) => format!("{scheme}://<redacted>@{host}"),
            None => trimmed.to_string(),
        }
    } else if trimmed.contains(':') {
        trimmed.to_string()
    } else {
        "<invalid-url>".to_string()
    }
}
