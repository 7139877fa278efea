use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    middleware::{AdminGuard, SuperAdminGuard},
    response::{Ack, ApiResult},
    services::{
        ServiceContext,
        admin_service::{AdminLogin, AdminRow, UpsertAdmin},
        bounds::non_blank,
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminList {
    pub admins: Vec<AdminRow>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/list", get(list))
        .route("/upsert", post(upsert))
        .route("/remove", post(remove))
        .with_state(state)
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<AdminLogin> {
    let (Some(id), Some(password)) = (
        non_blank(body.id.as_deref()),
        non_blank(body.password.as_deref()),
    ) else {
        return Err(AppError::bad_request("missing"));
    };
    let services = ServiceContext::from_state(state.as_ref());
    let login = services.admins().login(id, password).await?;
    Ok(Json(login))
}

async fn list(State(state): State<Arc<AppState>>, _guard: AdminGuard) -> ApiResult<AdminList> {
    let services = ServiceContext::from_state(state.as_ref());
    let admins = services.admins().list().await?;
    Ok(Json(AdminList { admins }))
}

async fn upsert(
    State(state): State<Arc<AppState>>,
    SuperAdminGuard { principal, .. }: SuperAdminGuard,
    Json(body): Json<UpsertRequest>,
) -> ApiResult<Ack> {
    let services = ServiceContext::from_state(state.as_ref());
    let input = UpsertAdmin {
        id: body.id.unwrap_or_default(),
        password: body.password,
        name: body.name,
        role: body.role,
    };
    services.admins().upsert(&principal, input).await?;
    Ack::ok()
}

async fn remove(
    State(state): State<Arc<AppState>>,
    SuperAdminGuard { principal, .. }: SuperAdminGuard,
    Json(body): Json<RemoveRequest>,
) -> ApiResult<Ack> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .admins()
        .remove(&principal, body.id.as_deref().unwrap_or_default())
        .await?;
    Ack::ok()
}
