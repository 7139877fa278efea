use std::sync::Arc;

use axum::Router;

use crate::{
    auth::bootstrap::seed_admins,
    clock::ManualClock,
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::app,
    services::ServiceContext,
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret";

/// Defaults plus a private in-memory SQLite store. One connection keeps
/// every query on the same memory database.
pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
    };
    cfg.auth.jwt_secret = TEST_SECRET.to_string();
    cfg
}

/// Fresh store with the default superadmin and admin seeded.
pub async fn test_state(clock: Arc<ManualClock>) -> Arc<AppState> {
    let cfg = test_config();
    let db = connection::connect(&cfg.database)
        .await
        .expect("connect in-memory sqlite");
    let state = AppState::new(cfg, db, clock);
    let services = ServiceContext::from_state(state.as_ref());
    seed_admins(&state.config.auth, &services)
        .await
        .expect("seed admins");
    state
}

pub async fn test_app(clock: Arc<ManualClock>) -> (Router, Arc<AppState>) {
    let state = test_state(clock).await;
    (app(Arc::clone(&state)), state)
}
