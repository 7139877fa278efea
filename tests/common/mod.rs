#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

use entitlement_server::{clock::ManualClock, state::AppState, test_helpers::test_app};

pub const T0: i64 = 1_700_000_000_000;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub async fn start() -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let (router, state) = test_app(Arc::clone(&clock)).await;
        Self {
            router,
            state,
            clock,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn admin_token(&self, id: &str, password: &str) -> String {
        let (status, body) = self
            .post("/admin/login", None, json!({"id": id, "password": password}))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn super_token(&self) -> String {
        self.admin_token("super", "super123").await
    }

    pub async fn admin1_token(&self) -> String {
        self.admin_token("admin1", "admin123").await
    }

    pub async fn user_token(&self, id: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/user/login",
                None,
                json!({"username": id, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_user(&self, admin_token: &str, id: &str, uses_left: i64) {
        let (status, body) = self
            .post(
                "/users/upsert",
                Some(admin_token),
                json!({
                    "id": id,
                    "password": "pw",
                    "displayName": id.to_uppercase(),
                    "usesLeft": uses_left,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body, json!({"ok": true}));
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
