//! Chat history endpoints

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{AddMessageRequest, CreateConversationRequest};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use teamgate_core::{conversation_title, Conversation, ConversationStore, StoredMessage};

fn store(state: &AppState) -> ApiResult<Arc<dyn ConversationStore>> {
    state
        .conversations
        .clone()
        .ok_or_else(|| ApiError::NotFound("Chat history is not enabled".to_string()))
}

/// `GET /conversations`
pub async fn list_conversations(State(state): State<AppState>) -> ApiResult<Json<Vec<Conversation>>> {
    Ok(Json(store(&state)?.list_conversations().await?))
}

/// `POST /conversations`
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(request): Json<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<Conversation>)> {
    let title = match (request.title, request.first_message) {
        (Some(title), _) if !title.trim().is_empty() => title,
        (_, Some(first)) if !first.trim().is_empty() => conversation_title(&first),
        _ => {
            return Err(ApiError::BadRequest(
                "Either 'title' or 'first_message' is required".to_string(),
            ))
        }
    };
    let conversation = store(&state)?.create_conversation(&title).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

/// `GET /conversations/:id/messages`
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<StoredMessage>>> {
    let store = store(&state)?;
    if store.get_conversation(id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Conversation {} not found", id)));
    }
    Ok(Json(store.messages(id).await?))
}

/// `POST /conversations/:id/messages`
pub async fn add_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AddMessageRequest>,
) -> ApiResult<(StatusCode, Json<StoredMessage>)> {
    if !matches!(request.role.as_str(), "user" | "assistant" | "system") {
        return Err(ApiError::BadRequest(format!("Invalid role: {}", request.role)));
    }
    let message = store(&state)?
        .add_message(id, &request.role, &request.content, request.model_used.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// `DELETE /conversations/:id`
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if store(&state)?.delete_conversation(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Conversation {} not found", id)))
    }
}
