use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{optional_filter, validate_limit, validate_page, validate_page_range};
use super::{ApiError, ApiResponse, AppState};
use crate::models::{LogFilter, LogPage};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub user_id: Option<i32>,
    pub action: Option<String>,
}

/// GET /logs
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<ApiResponse<LogPage>>, ApiError> {
    let page = validate_page(query.page)?;
    let limit = validate_limit(query.limit)?;
    validate_page_range(page, limit)?;

    let filter = LogFilter {
        user_id: query.user_id,
        action: optional_filter(query.action),
    };

    let logs = state.activity().list(&filter, page, limit).await?;

    Ok(Json(ApiResponse::success(logs)))
}

/// GET /logs/actions
pub async fn list_actions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let actions = state.activity().actions().await?;
    Ok(Json(ApiResponse::success(actions)))
}
