use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthResponse, ReadinessChecks, ReadinessResponse};

/// GET /health
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse { status: "ok" }))
}

/// GET /health/ready
pub async fn readiness(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<ReadinessResponse>>) {
    let database = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed: database unreachable");
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::success(ReadinessResponse {
            ready: database,
            checks: ReadinessChecks { database },
        })),
    )
}
