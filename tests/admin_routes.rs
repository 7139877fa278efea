mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn admin_login_returns_profile_and_token() {
    let app = TestApp::start().await;

    let (status, body) = app
        .post("/admin/login", None, json!({"id": "super", "password": "super123"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
    assert_eq!(
        body["admin"],
        json!({"id": "super", "name": "Super Admin", "role": "superadmin"})
    );

    let (status, body) = app
        .post("/admin/login", None, json!({"id": "super", "password": "wrong"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_credentials");

    let (status, _) = app.post("/admin/login", None, json!({"id": "super"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_list_puts_superadmins_first() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;

    let (status, _) = app
        .post(
            "/admin/upsert",
            Some(&super_token),
            json!({"id": "aaa", "password": "pw"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/admin/list", Some(&super_token)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["admins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["super", "aaa", "admin1"]);
    assert_eq!(body["admins"][1]["name"], "aaa");
    assert_eq!(body["admins"][1]["role"], "admin");
    assert!(body["admins"][1].get("passwordHash").is_none());
}

#[tokio::test]
async fn only_superadmins_manage_admins() {
    let app = TestApp::start().await;
    let admin_token = app.admin1_token().await;

    let (status, body) = app
        .post(
            "/admin/upsert",
            Some(&admin_token),
            json!({"id": "admin2", "password": "pw"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (status, _) = app
        .post("/admin/remove", Some(&admin_token), json!({"id": "super"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/admin/list", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn removing_self_is_rejected_for_every_role() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    let admin_token = app.admin1_token().await;

    let (status, body) = app
        .post("/admin/remove", Some(&super_token), json!({"id": "super"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "cannot remove self");

    let (status, _) = app
        .post("/admin/remove", Some(&admin_token), json!({"id": "admin1"}))
        .await;
    assert!(status.is_client_error());

    let (_, body) = app.get("/admin/list", Some(&super_token)).await;
    assert_eq!(body["admins"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn superadmin_can_promote_reset_and_remove_admins() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;

    let (status, _) = app
        .post(
            "/admin/upsert",
            Some(&super_token),
            json!({"id": "admin1", "name": "First", "role": "superadmin"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // password was omitted, so the seeded one still works
    let (status, body) = app
        .post("/admin/login", None, json!({"id": "admin1", "password": "admin123"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"]["role"], "superadmin");
    assert_eq!(body["admin"]["name"], "First");

    let (status, _) = app
        .post(
            "/admin/upsert",
            Some(&super_token),
            json!({"id": "admin9", "role": "owner", "password": "pw"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/admin/upsert", Some(&super_token), json!({"id": "admin9"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/admin/remove", Some(&super_token), json!({"id": "admin1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post("/admin/remove", Some(&super_token), json!({"id": "admin1"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn plain_admins_only_see_and_touch_their_own_users() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    let admin_token = app.admin1_token().await;

    app.create_user(&super_token, "by-super", 1).await;
    app.create_user(&admin_token, "by-admin", 1).await;

    let (status, body) = app.get("/users/list", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["users"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "by-admin");
    assert_eq!(rows[0]["createdBy"], "admin1");

    let (_, body) = app.get("/users/list", Some(&super_token)).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 2);

    for (uri, payload) in [
        ("/users/addUses", json!({"id": "by-super", "n": 5})),
        ("/users/setUnlimited", json!({"id": "by-super"})),
        ("/users/remove", json!({"id": "by-super"})),
        ("/users/upsert", json!({"id": "by-super", "usesLeft": 99})),
    ] {
        let (status, body) = app.post(uri, Some(&admin_token), payload).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}: {body}");
    }

    let (status, _) = app
        .post("/users/addUses", Some(&super_token), json!({"id": "by-admin", "n": 2}))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn user_upsert_patches_only_given_fields() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 4).await;

    let (status, _) = app
        .post(
            "/users/upsert",
            Some(&super_token),
            json!({"id": "u1", "displayName": "Renamed"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/users/list", Some(&super_token)).await;
    let row = &body["users"][0];
    assert_eq!(row["displayName"], "Renamed");
    assert_eq!(row["usesLeft"], 4);
    assert_eq!(row["unlimited"], false);
    assert_eq!(row["disabled"], false);
    assert_eq!(row["role"], "user");

    // the old password survives an update that omits it
    app.user_token("u1", "pw").await;

    let (status, _) = app
        .post(
            "/users/upsert",
            Some(&super_token),
            json!({"id": "u1", "role": "superadmin"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_uses_is_clamped_and_missing_users_are_not_found() {
    let app = TestApp::start().await;
    let super_token = app.super_token().await;
    app.create_user(&super_token, "u1", 0).await;

    let (status, _) = app
        .post("/users/addUses", Some(&super_token), json!({"id": "u1", "n": 0}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post(
            "/users/addUses",
            Some(&super_token),
            json!({"id": "u1", "n": 5_000_000}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/users/list", Some(&super_token)).await;
    assert_eq!(body["users"][0]["usesLeft"], 100_001);

    for uri in ["/users/addUses", "/users/setUnlimited", "/users/remove"] {
        let (status, body) = app
            .post(uri, Some(&super_token), json!({"id": "ghost"}))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["code"], "not_found");
    }

    let (status, _) = app
        .post("/users/addUses", Some(&super_token), json!({"n": 1}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
