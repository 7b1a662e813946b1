//! Service info, health, model listing and the log stream

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{ModelInfo, ModelList};
use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use axum::Json;
use futures_util::stream::{BoxStream, StreamExt};
use serde_json::{json, Value};
use std::convert::Infallible;
use teamgate_core::{scrub_message, subscribe_logs, LogEvent};
use tokio_stream::wrappers::BroadcastStream;

/// `GET /`
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Teamgate Multi-Agent Teams API",
        "description": "OpenAI-compatible API for keyword-routed agent teams",
        "endpoints": {
            "models": "/v1/models",
            "chat": "/v1/chat/completions",
            "teams": "/teams",
            "memories": "/memories/",
            "mcp": "/mcp/memories/{user_id}",
            "conversations": "/conversations",
            "presentations": "/presentations",
            "status": "/status",
        },
        "backend": state.executor.backend_name(),
        "available_teams": state.executor.catalog().ids(),
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "available_teams": state.executor.catalog().teams().len(),
        "uptime": state.start_time.elapsed().as_secs(),
    }))
}

/// `GET /v1/models`
pub async fn list_models(State(state): State<AppState>) -> Json<ModelList> {
    Json(ModelList {
        object: "list".to_string(),
        data: state
            .executor
            .catalog()
            .ids()
            .into_iter()
            .map(ModelInfo::team)
            .collect(),
    })
}

/// `GET /v1/models/:id`
pub async fn get_model(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> ApiResult<Json<ModelInfo>> {
    state
        .executor
        .catalog()
        .get(&model_id)
        .map(|team| Json(ModelInfo::team(&team.id)))
        .ok_or_else(|| ApiError::NotFound("Model not found".to_string()))
}

fn log_event(mut ev: LogEvent) -> Event {
    ev.message = scrub_message(ev.message);
    let data = serde_json::to_string(&ev).unwrap_or_else(|_| "{}".to_string());
    Event::default().data(data)
}

/// `GET /logs`: scrubbed log events as SSE
pub async fn logs_sse() -> Sse<BoxStream<'static, std::result::Result<Event, Infallible>>> {
    let stream: BoxStream<'static, std::result::Result<Event, Infallible>> = match subscribe_logs()
    {
        Some(rx) => BroadcastStream::new(rx)
            .filter_map(|item| async move { item.ok().map(|ev| Ok(log_event(ev))) })
            .boxed(),
        None => futures_util::stream::once(async {
            Ok(log_event(LogEvent {
                level: "INFO".into(),
                target: "init".into(),
                message: "logging not initialized".into(),
                file: None,
                line: None,
                time: chrono::Utc::now().to_rfc3339(),
            }))
        })
        .boxed(),
    };
    Sse::new(stream)
}
