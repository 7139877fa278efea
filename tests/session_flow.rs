mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use futures_util::future::join_all;
use serde_json::json;

use common::{T0, TestApp, request};

#[tokio::test]
async fn consume_requires_uses_until_an_admin_grants_them() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 0).await;

    let (status, body) = app
        .post("/user/login", None, json!({"username": "u1", "password": "pw"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sess"]["usesLeft"], 0);
    assert_eq!(body["sess"]["cycleEndAt"], 0);
    assert_eq!(body["sess"]["displayName"], "U1");
    let user_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.post("/user/consume", Some(&user_token), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "no_uses");
    assert_eq!(body["message"], "no_uses");

    let (status, _) = app
        .post("/users/addUses", Some(&super_token), json!({"id": "u1", "n": 3}))
        .await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(1_000);
    let (status, body) = app.post("/user/consume", Some(&user_token), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["sess"]["usesLeft"], 2);
    assert_eq!(body["sess"]["cycleEndAt"], T0 + 1_000 + 300_000);
}

#[tokio::test]
async fn exhausted_consume_leaves_cycle_untouched() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 1).await;
    let user_token = app.user_token("u1", "pw").await;

    let (status, body) = app.post("/user/consume", Some(&user_token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let cycle_end_at = body["sess"]["cycleEndAt"].clone();
    assert_eq!(cycle_end_at, T0 + 300_000);

    app.clock.advance(10_000);
    let (status, body) = app.post("/user/consume", Some(&user_token), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "no_uses");

    let (status, body) = app.get("/user/refresh", Some(&user_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sess"]["usesLeft"], 0);
    assert_eq!(body["sess"]["cycleEndAt"], cycle_end_at);
}

#[tokio::test]
async fn unlimited_consume_only_moves_the_cycle() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 0).await;
    let (status, _) = app
        .post("/users/setUnlimited", Some(&super_token), json!({"id": "u1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let user_token = app.user_token("u1", "pw").await;

    for step in 1..=3 {
        app.clock.advance(60_000);
        let (status, body) = app.post("/user/consume", Some(&user_token), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sess"]["usesLeft"], 0);
        assert_eq!(body["sess"]["unlimited"], true);
        assert_eq!(body["sess"]["cycleEndAt"], T0 + step * 60_000 + 300_000);
    }

    let (status, _) = app
        .post(
            "/users/setUnlimited",
            Some(&super_token),
            json!({"id": "u1", "unlimited": false}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.post("/user/consume", Some(&user_token), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "no_uses");
}

#[tokio::test]
async fn login_failures_do_not_reveal_which_part_was_wrong() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 1).await;

    let (status, wrong_password) = app
        .post("/user/login", None, json!({"username": "u1", "password": "nope"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = app
        .post("/user/login", None, json!({"username": "ghost", "password": "pw"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(unknown_user["code"], "invalid_credentials");

    let (status, body) = app
        .post("/user/login", None, json!({"username": "u1"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn disabled_user_is_refused_everywhere() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 5).await;
    let user_token = app.user_token("u1", "pw").await;

    let (status, _) = app
        .post(
            "/users/upsert",
            Some(&super_token),
            json!({"id": "u1", "disabled": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/user/login", None, json!({"username": "u1", "password": "pw"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "disabled");

    let (status, body) = app.get("/user/refresh", Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "disabled");

    let (status, body) = app.post("/user/consume", Some(&user_token), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "disabled");
}

#[tokio::test]
async fn refresh_after_removal_is_not_found() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 5).await;
    let user_token = app.user_token("u1", "pw").await;

    let (status, _) = app
        .post("/users/remove", Some(&super_token), json!({"id": "u1"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/user/refresh", Some(&user_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn tokens_are_bound_to_their_type() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 5).await;
    let user_token = app.user_token("u1", "pw").await;

    let (status, _) = app.get("/user/refresh", Some(&super_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.post("/user/consume", Some(&super_token), json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/users/list", Some(&user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.get("/admin/list", Some(&user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .post(
            "/override/set",
            Some(&user_token),
            json!({"vendor": "pg", "gameId": "g", "roomNo": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_scheme_is_matched_loosely() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 5).await;
    let user_token = app.user_token("u1", "pw").await;

    for value in [
        format!("bearer {user_token}"),
        format!("BEARER   {user_token}"),
    ] {
        let (status, body) = app
            .send(
                Request::builder()
                    .uri("/user/refresh")
                    .header(header::AUTHORIZATION, value.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{value}");
        assert_eq!(body["sess"]["id"], "u1");
    }
}

#[tokio::test]
async fn missing_or_expired_tokens_are_unauthorized() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 5).await;
    let user_token = app.user_token("u1", "pw").await;

    let (status, body) = app.get("/user/refresh", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = app.get("/user/refresh", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // user tokens live for thirty days
    app.clock.advance(30 * 24 * 60 * 60 * 1000 + 1_000);
    let (status, _) = app.get("/user/refresh", Some(&user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_profile_hides_secrets_and_reports_lock() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 0).await;

    let (status, body) = app.get("/user/public?id=u1", None).await;
    assert_eq!(status, StatusCode::OK);
    let user = &body["user"];
    assert_eq!(user["id"], "u1");
    assert_eq!(user["usesLeft"], 0);
    assert_eq!(user["locked"], true);
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());

    let (_, body) = app.get("/user/public?id=ghost", None).await;
    assert_eq!(body, json!({"user": null}));
    let (_, body) = app.get("/user/public", None).await;
    assert_eq!(body, json!({"user": null}));
}

#[tokio::test]
async fn concurrent_consumes_never_overspend() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 3).await;
    let user_token = app.user_token("u1", "pw").await;

    let calls = (0..6).map(|_| {
        app.send(request(
            "POST",
            "/user/consume",
            Some(&user_token),
            Some(json!({})),
        ))
    });
    let results = join_all(calls).await;

    let succeeded = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::OK)
        .count();
    let exhausted = results
        .iter()
        .filter(|(status, body)| *status == StatusCode::FORBIDDEN && body["code"] == "no_uses")
        .count();
    assert_eq!(succeeded, 3);
    assert_eq!(exhausted, 3);

    let (_, body) = app.get("/user/refresh", Some(&user_token)).await;
    assert_eq!(body["sess"]["usesLeft"], 0);
}
