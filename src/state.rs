use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::TokenService, clock::Clock, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub tokens: TokenService,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, clock: Arc<dyn Clock>) -> Arc<Self> {
        let tokens = TokenService::new(config.auth.jwt_secret.as_bytes(), Arc::clone(&clock));
        Arc::new(Self {
            config,
            db,
            tokens,
            clock,
        })
    }
}
