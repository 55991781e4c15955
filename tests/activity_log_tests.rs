mod common;

use axum::http::StatusCode;
use common::spawn_app;
use holywins::models::NewActivity;
use std::collections::HashSet;

#[tokio::test]
async fn test_pagination_is_stable_for_any_limit() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;

    for i in 0..23 {
        app.shared
            .activity
            .record(NewActivity::new(None, "seed").details(format!("entry {i}")))
            .await;
    }

    let (_, first) = admin.get("/api/logs?action=seed").await;
    let total = first["data"]["pagination"]["total"].as_u64().unwrap();
    assert_eq!(total, 23);

    for limit in [1_u64, 4, 5, 23, 100] {
        let mut seen = HashSet::new();
        let mut previous: Option<(String, i64)> = None;
        let mut page = 1;

        loop {
            let (status, body) = admin
                .get(&format!("/api/logs?action=seed&page={page}&limit={limit}"))
                .await;
            assert_eq!(status, StatusCode::OK);

            let pagination = &body["data"]["pagination"];
            assert_eq!(pagination["totalPages"].as_u64().unwrap(), total.div_ceil(limit));

            let logs = body["data"]["logs"].as_array().unwrap();
            if logs.is_empty() {
                break;
            }

            for entry in logs {
                let key = (
                    entry["created_at"].as_str().unwrap().to_string(),
                    entry["id"].as_i64().unwrap(),
                );
                if let Some(prev) = &previous {
                    assert!(&key < prev, "entries must be strictly descending");
                }
                assert!(seen.insert(key.1), "duplicate entry across pages");
                previous = Some(key);
            }
            page += 1;
        }

        assert_eq!(seen.len() as u64, total, "limit {limit}");
    }
}

#[tokio::test]
async fn test_logs_record_login_and_logout() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;
    admin.create_user("liz", "liz@x.com", "secret1", "editor").await;

    let mut liz = app.client();
    liz.login("liz", "secret1").await;
    liz.request(axum::http::Method::POST, "/api/auth/logout", None)
        .await;

    let (status, body) = admin.get("/api/logs?action=logout").await;
    assert_eq!(status, StatusCode::OK);
    let logs = body["data"]["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["username"], "liz");
    assert_eq!(logs[0]["email"], "liz@x.com");
    assert_eq!(logs[0]["details"], "User logged out");

    let (_, body) = admin.get("/api/logs?action=login").await;
    assert_eq!(body["data"]["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_entries_survive_user_deletion() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;
    let id = admin.create_user("mike", "mike@x.com", "secret1", "editor").await;

    let mut mike = app.client();
    mike.login("mike", "secret1").await;

    admin.delete(&format!("/api/users/{id}")).await;

    let (status, body) = admin.get(&format!("/api/logs?userId={id}")).await;
    assert_eq!(status, StatusCode::OK);
    let logs = body["data"]["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["action"], "login");
    assert_eq!(logs[0]["user_id"], id);
    assert!(logs[0]["username"].is_null());
    assert!(logs[0]["email"].is_null());
}

#[tokio::test]
async fn test_distinct_actions_are_sorted() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;
    let id = admin.create_user("nina", "nina@x.com", "secret1", "editor").await;
    admin.patch(&format!("/api/users/{id}/toggle-status")).await;
    admin.patch(&format!("/api/users/{id}/toggle-status")).await;

    let (status, body) = admin.get("/api/logs/actions").await;
    assert_eq!(status, StatusCode::OK);

    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a.as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["create_user", "login", "toggle_user_status"]);
}

#[tokio::test]
async fn test_log_query_validation() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;

    assert_eq!(admin.get("/api/logs?limit=0").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(admin.get("/api/logs?limit=101").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(admin.get("/api/logs?page=0").await.0, StatusCode::BAD_REQUEST);

    let (status, body) = admin.get("/api/logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["page"], 1);
    assert_eq!(body["data"]["pagination"]["limit"], 50);
}

#[tokio::test]
async fn test_page_beyond_addressable_offset_is_rejected() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;

    let (status, body) = admin
        .get("/api/logs?page=18446744073709551615&limit=100")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = admin
        .get("/api/logs?page=1152921504606846976&limit=10")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The server is still up and far pages inside the range are just empty.
    let (status, body) = admin.get("/api/logs?page=1000000&limit=100").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["logs"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["pagination"]["page"], 1_000_000);
}

#[tokio::test]
async fn test_action_filter_matches_exactly() {
    let app = spawn_app().await;
    let mut admin = app.admin().await;

    let (_, body) = admin.get("/api/logs?action=login").await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    for query in ["action=%20login", "action=login%20", "action=LOGIN", "action=log"] {
        let (status, body) = admin.get(&format!("/api/logs?{query}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["pagination"]["total"], 0, "{query}");
    }

    // An empty value means no filter.
    let (_, body) = admin.get("/api/logs?action=").await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
}
