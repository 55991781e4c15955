use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_user_id;
use super::{
    ApiError, ApiResponse, AppState, ClientIp, CreatedUserDto, MessageResponse,
    ToggleStatusResponse, UserDto,
};
use crate::models::SessionUser;
use crate::services::CreateUserInput;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: Option<String>,
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.user_service().list_users().await?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Extension(actor): Extension<SessionUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedUserDto>>), ApiError> {
    let input = CreateUserInput {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        role: payload.role,
    };

    let user = state.user_service().create_user(&actor, input, ip).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedUserDto::from(user))),
    ))
}

/// POST /users/{id}/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ClientIp(ip): ClientIp,
    Extension(actor): Extension<SessionUser>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_user_id(id)?;
    let new_password = payload.new_password.unwrap_or_default();

    state
        .user_service()
        .reset_password(&actor, id, &new_password, ip)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password reset successfully",
    ))))
}

/// PATCH /users/{id}/toggle-status
pub async fn toggle_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ClientIp(ip): ClientIp,
    Extension(actor): Extension<SessionUser>,
) -> Result<Json<ApiResponse<ToggleStatusResponse>>, ApiError> {
    let id = validate_user_id(id)?;

    let is_active = state.user_service().toggle_status(&actor, id, ip).await?;

    let message = if is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };

    Ok(Json(ApiResponse::success(ToggleStatusResponse {
        message: message.to_string(),
        is_active,
    })))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ClientIp(ip): ClientIp,
    Extension(actor): Extension<SessionUser>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_user_id(id)?;

    state.user_service().delete_user(&actor, id, ip).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "User deleted successfully",
    ))))
}
