use axum::{
    Extension, Json,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, ClientIp, MessageResponse};
use crate::constants::auth::SESSION_USER_KEY;
use crate::models::{SessionUser, UserInfo, UserSummary};
use crate::services::AuthError;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

// ============================================================================
// Access Guard
// ============================================================================

/// Rejects requests without a session user and hands the user to handlers
/// through request extensions.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = session_user(&session)
        .await?
        .ok_or_else(ApiError::unauthenticated)?;

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Must run inside [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<SessionUser>()
        .ok_or_else(ApiError::unauthenticated)?;

    if !user.role.is_admin() {
        tracing::warn!(user_id = user.id, role = %user.role, "Admin route denied");
        return Err(ApiError::admin_only());
    }

    Ok(next.run(request).await)
}

async fn session_user(session: &Session) -> Result<Option<SessionUser>, ApiError> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    ClientIp(ip): ClientIp,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    let (Some(username), Some(password)) = (
        payload.username.filter(|u| !u.trim().is_empty()),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation("Username and password are required"));
    };

    let user = state
        .auth_service()
        .login(username.trim(), &password, ip)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(SESSION_USER_KEY, SessionUser::from(&user))
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(ApiResponse::success(UserSummary::from(&user))))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Session,
    ClientIp(ip): ClientIp,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.auth_service().logout(&user, ip).await;

    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to destroy session: {e}")))?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    match state.auth_service().current_user(user.id).await {
        Ok(info) => Ok(Json(ApiResponse::success(info))),
        Err(AuthError::UserNotFound) => {
            if let Err(e) = session.flush().await {
                tracing::warn!("Failed to destroy stale session: {e}");
            }
            Err(ApiError::Unauthorized("User not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /auth/change-password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let current = payload.current_password.unwrap_or_default();
    let new = payload.new_password.unwrap_or_default();

    match state
        .auth_service()
        .change_password(&user, &current, &new, ip)
        .await
    {
        Ok(()) => Ok(Json(ApiResponse::success(MessageResponse::new(
            "Password changed successfully",
        )))),
        Err(AuthError::InvalidCredentials) => Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
