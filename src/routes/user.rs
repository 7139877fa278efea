use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    middleware::UserGuard,
    response::ApiResult,
    services::{
        ServiceContext,
        bounds::non_blank,
        session_service::{LoginOutcome, PublicProfile, SessionSnapshot},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PublicQuery {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub user: Option<PublicProfile>,
}

#[derive(Debug, Serialize)]
pub struct Session {
    pub sess: SessionSnapshot,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/public", get(public))
        .route("/login", post(login))
        .route("/refresh", get(refresh))
        .route("/consume", post(consume))
        .with_state(state)
}

async fn public(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PublicQuery>,
) -> ApiResult<PublicUser> {
    let Some(id) = non_blank(query.id.as_deref()) else {
        return Ok(Json(PublicUser { user: None }));
    };
    let services = ServiceContext::from_state(state.as_ref());
    let user = services.session().public_profile(id).await?;
    Ok(Json(PublicUser { user }))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<LoginOutcome> {
    let (Some(username), Some(password)) = (
        non_blank(body.username.as_deref()),
        non_blank(body.password.as_deref()),
    ) else {
        return Err(AppError::bad_request("missing"));
    };
    let services = ServiceContext::from_state(state.as_ref());
    let outcome = services.session().login(username, password).await?;
    Ok(Json(outcome))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    UserGuard { principal, .. }: UserGuard,
) -> ApiResult<Session> {
    let services = ServiceContext::from_state(state.as_ref());
    let sess = services.session().refresh(&principal).await?;
    Ok(Json(Session { sess }))
}

// The body is ignored; clients send `{}`.
async fn consume(
    State(state): State<Arc<AppState>>,
    UserGuard { principal, .. }: UserGuard,
) -> ApiResult<Session> {
    let services = ServiceContext::from_state(state.as_ref());
    let sess = services.session().consume_one_use(&principal).await?;
    Ok(Json(Session { sess }))
}
