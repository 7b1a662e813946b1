//! Collaborator health reports

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::status::{StatusMonitor, SystemStatus};
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

fn monitor(state: &AppState) -> ApiResult<Arc<StatusMonitor>> {
    state
        .status
        .clone()
        .ok_or_else(|| ApiError::NotFound("Status monitoring is not enabled".to_string()))
}

/// `GET /status`: check everything now
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<SystemStatus>> {
    Ok(Json(monitor(&state)?.refresh().await))
}

/// `GET /status/cached`: the last background report
pub async fn cached_status(State(state): State<AppState>) -> ApiResult<Json<SystemStatus>> {
    monitor(&state)?
        .cached()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::Unavailable("Status cache not ready".to_string()))
}
