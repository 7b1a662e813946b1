//! Slide deck endpoints

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use teamgate_plugin_presentation::{
    GeneratedPresentation, Presentation, PresentationRequest, PresentationService,
    PresentationSummary,
};

fn service(state: &AppState) -> ApiResult<Arc<PresentationService>> {
    state
        .presentations
        .clone()
        .ok_or_else(|| ApiError::NotFound("Presentations are not enabled".to_string()))
}

/// `POST /presentations/generate`
pub async fn generate_presentation(
    State(state): State<AppState>,
    Json(request): Json<PresentationRequest>,
) -> ApiResult<Json<GeneratedPresentation>> {
    Ok(Json(service(&state)?.generate(&request).await?))
}

/// `GET /presentations`
pub async fn list_presentations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PresentationSummary>>> {
    Ok(Json(service(&state)?.list().await?))
}

/// `GET /presentations/:id`
pub async fn get_presentation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Presentation>> {
    Ok(Json(service(&state)?.get(&id).await?))
}
