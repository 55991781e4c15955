mod common;

use axum::http::StatusCode;
use common::{ADMIN_PASSWORD, ADMIN_USERNAME, spawn_app, spawn_app_with};
use holywins::config::Environment;
use sea_orm::ConnectionTrait;
use serde_json::json;

#[tokio::test]
async fn test_login_returns_summary_and_session() {
    let app = spawn_app().await;
    let mut client = app.client();

    let (status, body) = client.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert!(client.has_session_cookie());
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], ADMIN_USERNAME);
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["data"].get("password_hash").is_none());

    let (status, me) = client.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["id"], body["data"]["id"]);
    assert_eq!(me["data"]["email"], body["data"]["email"]);
    assert!(me["data"]["last_login"].is_string());
    assert!(me["data"]["created_at"].is_string());
}

#[tokio::test]
async fn test_login_by_email() {
    let app = spawn_app().await;
    let mut client = app.client();

    let (status, body) = client.login("admin@localhost", ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], ADMIN_USERNAME);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = spawn_app().await;
    let mut client = app.client();

    let (status, _) = client
        .post("/api/auth/login", json!({ "username": "admin" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client
        .post("/api/auth/login", json!({ "username": "  ", "password": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!client.has_session_cookie());
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_the_same() {
    let app = spawn_app().await;
    let mut client = app.client();

    let (unknown_status, unknown) = client.login("nobody", "whatever1").await;
    let (wrong_status, wrong) = client.login(ADMIN_USERNAME, "not-the-password").await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["error"], wrong["error"]);
    assert!(!client.has_session_cookie());

    let (status, _) = client.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disabled_account_is_rejected_for_any_password() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;

    let id = admin
        .create_user("dave", "dave@x.com", "secret1", "editor")
        .await;
    let (status, body) = admin.patch(&format!("/api/users/{id}/toggle-status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let mut dave = app.client();
    let (status, _) = dave.login("dave", "secret1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = dave.login("dave", "wrong-password").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!dave.has_session_cookie());
}

#[tokio::test]
async fn test_logout_then_me_is_unauthorized() {
    let app = spawn_app().await;
    let mut client = app.admin().await;

    let (status, _) = client.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = client.request(axum::http::Method::POST, "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["message"].is_string());

    let (status, _) = client.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_requires_session() {
    let app = spawn_app().await;
    let mut client = app.client();

    let (status, body) = client.request(axum::http::Method::POST, "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_change_password_then_login() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;
    admin
        .create_user("erin", "erin@x.com", "secret1", "editor")
        .await;

    let mut erin = app.client();
    assert_eq!(erin.login("erin", "secret1").await.0, StatusCode::OK);

    let (status, _) = erin
        .post(
            "/api/auth/change-password",
            json!({ "currentPassword": "secret1", "newPassword": "secret2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let mut fresh = app.client();
    assert_eq!(fresh.login("erin", "secret1").await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(fresh.login("erin", "secret2").await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_validation() {
    let app = spawn_app().await;
    let mut client = app.admin().await;

    let (status, _) = client
        .post("/api/auth/change-password", json!({ "currentPassword": ADMIN_PASSWORD }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client
        .post(
            "/api/auth/change-password",
            json!({ "currentPassword": ADMIN_PASSWORD, "newPassword": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = client
        .post(
            "/api/auth/change-password",
            json!({ "currentPassword": "wrong-one", "newPassword": "longenough" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Current password is incorrect");

    // a wrong current password must not log the user out
    let (status, _) = client.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_after_account_deleted() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;
    let id = admin
        .create_user("frank", "frank@x.com", "secret1", "editor")
        .await;

    let mut frank = app.client();
    assert_eq!(frank.login("frank", "secret1").await.0, StatusCode::OK);

    let (status, _) = admin.delete(&format!("/api/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = frank.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the stale session was destroyed, so the guard now rejects it as well
    let (status, _) = frank.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let app = spawn_app().await;
    let mut client = app.client();

    let (status, body) = client.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = client.get("/api/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ready"], true);
    assert_eq!(body["data"]["checks"]["database"], true);
}

fn cookie_attributes(set_cookie: &str) -> Vec<String> {
    set_cookie
        .split(';')
        .skip(1)
        .map(|attr| attr.trim().to_string())
        .collect()
}

#[tokio::test]
async fn test_session_cookie_policy_in_development() {
    let app = spawn_app().await;
    let mut client = app.client();
    client.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let set_cookie = client.last_set_cookie.clone().expect("login sets a cookie");
    assert!(set_cookie.starts_with("holywins.sid="));

    let attrs = cookie_attributes(&set_cookie);
    assert!(attrs.iter().any(|a| a == "HttpOnly"), "{set_cookie}");
    assert!(attrs.iter().any(|a| a == "SameSite=Lax"), "{set_cookie}");
    assert!(attrs.iter().any(|a| a == "Path=/"), "{set_cookie}");
    assert!(attrs.iter().any(|a| a == "Max-Age=86400"), "{set_cookie}");
    assert!(!attrs.iter().any(|a| a == "Secure"), "{set_cookie}");
}

#[tokio::test]
async fn test_session_cookie_policy_in_production() {
    let app = spawn_app_with(|config| {
        config.general.environment = Environment::Production;
    })
    .await;
    let mut client = app.client();
    let (status, _) = client.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);

    let set_cookie = client.last_set_cookie.clone().expect("login sets a cookie");
    let attrs = cookie_attributes(&set_cookie);
    assert!(attrs.iter().any(|a| a == "HttpOnly"), "{set_cookie}");
    assert!(attrs.iter().any(|a| a == "SameSite=Strict"), "{set_cookie}");
    assert!(attrs.iter().any(|a| a == "Secure"), "{set_cookie}");
    assert!(attrs.iter().any(|a| a == "Max-Age=86400"), "{set_cookie}");
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let app = spawn_app().await;
    let mut client = app.admin().await;

    let (status, _) = client.request(axum::http::Method::POST, "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);

    let set_cookie = client.last_set_cookie.clone().expect("logout sets a removal cookie");
    assert!(set_cookie.starts_with("holywins.sid=;"), "{set_cookie}");
    let attrs = cookie_attributes(&set_cookie);
    assert!(attrs.iter().any(|a| a == "Max-Age=0"), "{set_cookie}");
    assert!(attrs.iter().any(|a| a == "Path=/"), "{set_cookie}");
    assert!(!client.has_session_cookie());
}

#[tokio::test]
async fn test_actions_succeed_when_activity_log_is_unwritable() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;

    app.shared
        .store
        .conn
        .execute_unprepared("DROP TABLE activity_logs")
        .await
        .unwrap();

    let mut client = app.client();
    let (status, body) = client.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(client.has_session_cookie());

    let id = admin.create_user("olga", "olga@x.com", "secret1", "editor").await;
    assert!(id > 0);

    let (status, _) = client.request(axum::http::Method::POST, "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
}
