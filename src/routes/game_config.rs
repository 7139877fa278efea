use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AdminGuard,
    response::{Ack, ApiResult},
    routes::params::loose_i64,
    services::{ServiceContext, bounds::non_blank, game_config_service::GameConfigView},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigQuery {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub game_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequest {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub pages: Option<i64>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub total_rooms: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub cfg: Option<GameConfigView>,
}

#[derive(Debug, Serialize)]
pub struct AllResponse {
    pub cfg: BTreeMap<String, GameConfigView>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get", get(get_config))
        .route("/all", get(all))
        .route("/set", post(set))
        .with_state(state)
}

async fn get_config(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConfigQuery>,
) -> ApiResult<ConfigResponse> {
    let (Some(vendor), Some(game_id)) = (
        non_blank(query.vendor.as_deref()),
        non_blank(query.game_id.as_deref()),
    ) else {
        return Ok(Json(ConfigResponse { cfg: None }));
    };
    let services = ServiceContext::from_state(state.as_ref());
    let cfg = services.game_configs().get(vendor, game_id).await?;
    Ok(Json(ConfigResponse { cfg: Some(cfg) }))
}

async fn all(State(state): State<Arc<AppState>>) -> ApiResult<AllResponse> {
    let services = ServiceContext::from_state(state.as_ref());
    let cfg = services.game_configs().list_all().await?;
    Ok(Json(AllResponse { cfg }))
}

async fn set(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Json(body): Json<SetRequest>,
) -> ApiResult<Ack> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .game_configs()
        .set(
            body.vendor.as_deref(),
            body.game_id.as_deref(),
            body.pages,
            body.total_rooms,
        )
        .await?;
    Ack::ok()
}
