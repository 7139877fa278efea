use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    error::AppError,
    middleware::{catch_panic_layer, cors_layer, json_error_middleware, preflight_middleware},
    state::AppState,
};

use super::{admin, game_config, health, overrides, user, users};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/admin", admin::router(state.clone()))
        .nest("/users", users::router(state.clone()))
        .nest("/user", user::router(state.clone()))
        .nest("/override", overrides::router(state.clone()))
        .nest("/cfg", game_config::router(state.clone()))
        .merge(health::router(state))
        .fallback(not_found)
}

/// The router with every cross-cutting layer applied, ready to serve.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors);
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(cors)
        .layer(middleware::from_fn(preflight_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> AppError {
    AppError::not_found("not found")
}
