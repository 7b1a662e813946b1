//! OpenAI-compatible chat completions

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{
    unix_now, ChatChoice, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse,
    Usage,
};
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::convert::Infallible;
use teamgate_core::{Message, TextChunk};
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

fn completion_id() -> String {
    format!("chatcmpl-{}", uuid::Uuid::new_v4())
}

fn chunk_event(chunk: &ChatCompletionChunk) -> Event {
    let data = serde_json::to_string(chunk).unwrap_or_else(|_| "{}".to_string());
    Event::default().data(data)
}

/// `POST /v1/chat/completions`
pub async fn chat_completions(
    State(state): State<AppState>,
    Json(request): Json<ChatCompletionRequest>,
) -> ApiResult<Response> {
    if request.messages.is_empty() {
        return Err(ApiError::BadRequest("No messages provided".to_string()));
    }
    let team = state
        .executor
        .catalog()
        .get(&request.model)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown model: {}", request.model)))?;

    info!(
        team = %team.id,
        stream = request.stream,
        messages = request.messages.len(),
        "chat completion request"
    );

    let options = request.options();
    if request.stream {
        let upstream = state
            .executor
            .execute_stream(&request.model, &request.messages, Some(&options))
            .await?;
        return Ok(completion_sse(upstream, request.model).into_response());
    }

    let reply = state
        .executor
        .execute(&request.model, &request.messages, Some(&options))
        .await?;

    let usage = Usage::estimate(&request.messages, &reply.content);
    let response = ChatCompletionResponse {
        id: completion_id(),
        object: "chat.completion".to_string(),
        created: unix_now(),
        model: request.model,
        choices: vec![ChatChoice {
            index: 0,
            message: Message::assistant(reply.content),
            finish_reason: "stop".to_string(),
        }],
        usage,
    };
    Ok(Json(response).into_response())
}

/// Turn a team stream into `data:` events: one per non-empty chunk, then a
/// stop chunk, then `[DONE]`
pub fn completion_sse(
    upstream: teamgate_core::TextStream,
    model: String,
) -> Sse<BoxStream<'static, std::result::Result<Event, Infallible>>> {
    let id = completion_id();
    let content_id = id.clone();
    let content_model = model.clone();

    let content = ReceiverStream::new(upstream).filter_map(move |item| {
        let id = content_id.clone();
        let model = content_model.clone();
        async move {
            match item {
                Ok(TextChunk { text, .. }) if !text.is_empty() => {
                    Some(Ok::<_, Infallible>(chunk_event(&ChatCompletionChunk::content(&id, &model, text))))
                }
                Ok(_) => None,
                Err(e) => Some(Ok(chunk_event(&ChatCompletionChunk::content(
                    &id,
                    &model,
                    format!("Error in streaming response: {}", e),
                )))),
            }
        }
    });

    let tail = stream::iter(vec![
        Ok::<_, Infallible>(chunk_event(&ChatCompletionChunk::stop(&id, &model))),
        Ok(Event::default().data("[DONE]")),
    ]);

    Sse::new(content.chain(tail).boxed())
}
