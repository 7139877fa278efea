use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AdminGuard,
    response::{Ack, ApiResult},
    routes::params::loose_i64,
    services::{
        ServiceContext,
        user_service::{UpsertUser, UserRow},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub uses_left: Option<i64>,
    #[serde(default)]
    pub unlimited: Option<bool>,
    #[serde(default)]
    pub disabled: Option<bool>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdRequest {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddUsesRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub n: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SetUnlimitedRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub unlimited: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserRow>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/list", get(list))
        .route("/upsert", post(upsert))
        .route("/remove", post(remove))
        .route("/addUses", post(add_uses))
        .route("/setUnlimited", post(set_unlimited))
        .with_state(state)
}

async fn list(
    State(state): State<Arc<AppState>>,
    AdminGuard { principal, .. }: AdminGuard,
) -> ApiResult<UserList> {
    let services = ServiceContext::from_state(state.as_ref());
    let users = services.users().list(&principal).await?;
    Ok(Json(UserList { users }))
}

async fn upsert(
    State(state): State<Arc<AppState>>,
    AdminGuard { principal, .. }: AdminGuard,
    Json(body): Json<UpsertRequest>,
) -> ApiResult<Ack> {
    let services = ServiceContext::from_state(state.as_ref());
    let input = UpsertUser {
        id: body.id.unwrap_or_default(),
        password: body.password,
        display_name: body.display_name,
        uses_left: body.uses_left,
        unlimited: body.unlimited,
        disabled: body.disabled,
        role: body.role,
    };
    services.users().upsert(&principal, input).await?;
    Ack::ok()
}

async fn remove(
    State(state): State<Arc<AppState>>,
    AdminGuard { principal, .. }: AdminGuard,
    Json(body): Json<IdRequest>,
) -> ApiResult<Ack> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .users()
        .remove(&principal, body.id.as_deref().unwrap_or_default())
        .await?;
    Ack::ok()
}

async fn add_uses(
    State(state): State<Arc<AppState>>,
    AdminGuard { principal, .. }: AdminGuard,
    Json(body): Json<AddUsesRequest>,
) -> ApiResult<Ack> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .users()
        .add_uses(&principal, body.id.as_deref().unwrap_or_default(), body.n)
        .await?;
    Ack::ok()
}

async fn set_unlimited(
    State(state): State<Arc<AppState>>,
    AdminGuard { principal, .. }: AdminGuard,
    Json(body): Json<SetUnlimitedRequest>,
) -> ApiResult<Ack> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .users()
        .set_unlimited(
            &principal,
            body.id.as_deref().unwrap_or_default(),
            body.unlimited.unwrap_or(true),
        )
        .await?;
    Ack::ok()
}
