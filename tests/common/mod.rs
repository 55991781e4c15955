#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use holywins::config::Config;
use holywins::db::migrator::m20260101_create_users::{
    BOOTSTRAP_ADMIN_PASSWORD, BOOTSTRAP_ADMIN_USERNAME,
};
use holywins::models::UserPatch;
use holywins::state::SharedState;

pub const ADMIN_USERNAME: &str = BOOTSTRAP_ADMIN_USERNAME;
pub const ADMIN_PASSWORD: &str = BOOTSTRAP_ADMIN_PASSWORD;

pub struct TestApp {
    pub router: Router,
    pub shared: Arc<SharedState>,
    db_path: std::path::PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.db_path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

impl TestApp {
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
            last_set_cookie: None,
        }
    }

    /// A client already logged in as the bootstrap admin.
    pub async fn admin(&self) -> TestClient {
        let mut client = self.client();
        let (status, _) = client.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        client
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Like [`spawn_app`], with a hook to adjust the config before startup.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let db_path = std::env::temp_dir().join(format!("holywins-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.security.argon2_parallelism = 1;
    configure(&mut config);

    let shared = Arc::new(
        SharedState::new(config)
            .await
            .expect("Failed to create shared state"),
    );

    // The seeded hash uses production parameters; swap it for a cheap one.
    let admin = shared
        .store
        .get_user_by_username(ADMIN_USERNAME)
        .await
        .unwrap()
        .expect("bootstrap admin missing");
    let hash = shared.passwords.hash(ADMIN_PASSWORD).await.unwrap();
    shared
        .store
        .update_user(admin.id, UserPatch::password_hash(hash))
        .await
        .unwrap();

    let state = holywins::api::create_app_state(shared.clone(), None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: holywins::api::router(state),
        shared,
        db_path,
    }
}

/// Drives the router and keeps the session cookie between requests.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
    /// Raw `Set-Cookie` header of the most recent response, if any.
    pub last_set_cookie: Option<String>,
}

impl TestClient {
    pub async fn request(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        self.last_set_cookie = None;
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().unwrap();
            self.last_set_cookie = Some(set_cookie.to_string());
            let pair = set_cookie.split(';').next().unwrap_or_default().trim();
            let removed = set_cookie.contains("Max-Age=0") || pair.ends_with('=');
            self.cookie = if removed { None } else { Some(pair.to_string()) };
        }

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, None).await
    }

    pub async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login",
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    pub fn has_session_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// Creates an account through the API and returns its id.
    pub async fn create_user(&mut self, username: &str, email: &str, password: &str, role: &str) -> i32 {
        let (status, body) = self
            .post(
                "/api/users",
                serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": password,
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create_user failed: {body}");
        i32::try_from(body["data"]["id"].as_i64().unwrap()).unwrap()
    }
}
