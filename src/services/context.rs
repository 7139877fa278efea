use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::TokenService,
    clock::Clock,
    config::AuthConfig,
    db::dao::DaoContext,
    services::{
        admin_service::AdminService, game_config_service::GameConfigService,
        override_service::OverrideService, session_service::SessionService,
        user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    tokens: TokenService,
    clock: Arc<dyn Clock>,
    auth: AuthConfig,
}

impl ServiceContext {
    pub fn new(
        db: &DatabaseConnection,
        tokens: TokenService,
        clock: Arc<dyn Clock>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            daos: DaoContext::new(db),
            tokens,
            clock,
            auth,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            &state.db,
            state.tokens.clone(),
            Arc::clone(&state.clock),
            state.config.auth.clone(),
        )
    }

    pub fn session(&self) -> SessionService {
        SessionService::new(
            self.daos.user(),
            self.tokens.clone(),
            Arc::clone(&self.clock),
            self.auth.user_token_ttl_secs,
        )
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.daos.user(), Arc::clone(&self.clock))
    }

    pub fn admins(&self) -> AdminService {
        AdminService::new(
            self.daos.admin(),
            self.tokens.clone(),
            Arc::clone(&self.clock),
            self.auth.admin_token_ttl_secs,
        )
    }

    pub fn overrides(&self) -> OverrideService {
        OverrideService::new(self.daos.room_override(), Arc::clone(&self.clock))
    }

    pub fn game_configs(&self) -> GameConfigService {
        GameConfigService::new(self.daos.game_config(), Arc::clone(&self.clock))
    }
}
