use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{response::ApiResult, state::AppState};

#[derive(Debug, Serialize)]
pub struct Health {
    pub ok: bool,
    pub ts: i64,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state)
}

async fn root() -> &'static str {
    "OK"
}

async fn health(State(state): State<Arc<AppState>>) -> ApiResult<Health> {
    Ok(Json(Health {
        ok: true,
        ts: state.clock.now_ms(),
    }))
}
