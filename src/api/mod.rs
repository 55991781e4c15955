use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, patch, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, ExpiredDeletion, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ActivityLogger, AuthService, UserService};
use crate::state::SharedState;

pub mod auth;
mod client_ip;
mod error;
mod logs;
mod observability;
mod system;
mod types;
mod users;
mod validation;

pub use client_ip::{ClientIp, resolve_client_ip};
pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub session_store: SqliteStore,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn activity(&self) -> &ActivityLogger {
        &self.shared.activity
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }
}

/// Prepares the session table on the application database and drops
/// sessions that expired while the server was down.
pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let pool = shared.store.conn.get_sqlite_connection_pool().clone();
    let session_store = SqliteStore::new(pool);
    session_store
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare session store: {e}"))?;
    session_store
        .delete_expired()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge expired sessions: {e}"))?;

    info!("Session store ready");

    Ok(Arc::new(AppState {
        shared,
        session_store,
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config();

    let same_site = if config.is_production() {
        SameSite::Strict
    } else {
        SameSite::Lax
    };

    let session_layer = SessionManagerLayer::new(state.session_store.clone())
        .with_name(config.session.cookie_name.clone())
        .with_http_only(true)
        .with_secure(config.secure_cookies())
        .with_same_site(same_site)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(
            config.session.ttl_hours,
        )));

    let cors_layer = cors_layer(&config.server.cors_allowed_origins);

    let api_router = Router::new()
        .merge(create_admin_router())
        .merge(create_authenticated_router())
        .route("/auth/login", post(auth::login))
        .route("/health", get(system::health))
        .route("/health/ready", get(system::readiness))
        .layer(session_layer)
        // Runs after routing so the matched route is known.
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Credentialed requests need an explicit origin, so `*` mirrors the caller.
    if origins.iter().any(|o| o == "*") {
        layer
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        layer.allow_origin(origins).allow_credentials(true)
    }
}

fn create_authenticated_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/change-password", post(auth::change_password))
        .route_layer(middleware::from_fn(auth::require_auth))
}

fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/users/{id}/reset-password", post(users::reset_password))
        .route("/users/{id}/toggle-status", patch(users::toggle_status))
        .route("/logs", get(logs::list_logs))
        .route("/logs/actions", get(logs::list_actions))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn(auth::require_auth))
}
