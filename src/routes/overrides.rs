use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    middleware::AdminGuard,
    response::ApiResult,
    routes::params::loose_i64,
    services::{
        ServiceContext,
        override_service::{OverrideHit, OverrideService, OverrideTree},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideParams {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub room_no: Option<i64>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub rate: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HitResponse {
    pub hit: Option<OverrideHit>,
}

#[derive(Debug, Serialize)]
pub struct AllResponse {
    pub all: OverrideTree,
}

#[derive(Debug, Serialize)]
pub struct SetResponse {
    pub ok: bool,
    pub all: OverrideTree,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get", get(get_override))
        .route("/all", get(all))
        .route("/set", post(set))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            sweep_expired,
        ))
        .with_state(state)
}

/// Expired rows are dropped before any override route runs. A failed
/// sweep is logged and the request carries on.
async fn sweep_expired(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let services = ServiceContext::from_state(state.as_ref());
    if let Err(err) = services.overrides().sweep().await {
        tracing::warn!(error = %err, "override sweep failed");
    }
    next.run(req).await
}

async fn get_override(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OverrideParams>,
) -> ApiResult<HitResponse> {
    let Some(key) = OverrideService::key(
        params.vendor.as_deref(),
        params.game_id.as_deref(),
        params.room_no,
    ) else {
        return Ok(Json(HitResponse { hit: None }));
    };
    let services = ServiceContext::from_state(state.as_ref());
    let hit = services.overrides().get(&key).await?;
    Ok(Json(HitResponse { hit }))
}

async fn all(State(state): State<Arc<AppState>>) -> ApiResult<AllResponse> {
    let services = ServiceContext::from_state(state.as_ref());
    let all = services.overrides().list_all().await?;
    Ok(Json(AllResponse { all }))
}

async fn set(
    State(state): State<Arc<AppState>>,
    AdminGuard { principal, .. }: AdminGuard,
    Json(body): Json<OverrideParams>,
) -> ApiResult<SetResponse> {
    let key = OverrideService::key(
        body.vendor.as_deref(),
        body.game_id.as_deref(),
        body.room_no,
    )
    .ok_or_else(|| AppError::bad_request("missing"))?;

    let services = ServiceContext::from_state(state.as_ref());
    let overrides = services.overrides();
    overrides.set(&key, body.rate).await?;
    tracing::debug!(by = %principal.id, "override written");
    let all = overrides.list_all().await?;
    Ok(Json(SetResponse { ok: true, all }))
}
