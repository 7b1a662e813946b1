//! Team listing, routing and direct execution

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{
    ExecuteRequest, ExecuteResponse, ExecuteStreamLine, JsonObject, RouteRequest, RouteResponse,
    TeamSummary,
};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::StreamExt;
use std::convert::Infallible;
use teamgate_core::{codebase_context, with_codebase_context, Message, TeamConfig};
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

fn summary(team: &TeamConfig) -> TeamSummary {
    TeamSummary {
        name: team.display_name.clone(),
        description: team.description.clone(),
        agent_count: team.agents.len(),
        agents: team.agents.iter().map(|a| a.name.clone()).collect(),
        keywords: team.keywords.clone(),
        search_enabled: team.search_enabled(),
        is_default: team.is_default,
    }
}

/// `GET /teams`
pub async fn list_teams(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut teams = JsonObject::new();
    for team in state.executor.catalog().teams() {
        teams.insert(
            team.id.clone(),
            serde_json::to_value(summary(team)).unwrap_or_default(),
        );
    }
    Json(serde_json::json!({ "teams": teams }))
}

/// `POST /teams/route`
pub async fn route_team(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Json<RouteResponse> {
    let team = state.executor.catalog().route(&request.text);
    Json(RouteResponse {
        team_id: team.id.clone(),
        team_name: team.display_name.clone(),
    })
}

/// Messages and query for an execute request
fn conversation(request: ExecuteRequest) -> ApiResult<(Vec<Message>, String)> {
    let (mut messages, query) = if let Some(query) = request.query {
        if query.is_empty() {
            return Err(ApiError::BadRequest("Query is required".to_string()));
        }
        (vec![Message::user(query.clone())], query)
    } else if let Some(messages) = request.messages {
        let Some(last) = messages.last() else {
            return Err(ApiError::BadRequest("Messages are required".to_string()));
        };
        let query = last.content.clone();
        (messages, query)
    } else {
        return Err(ApiError::BadRequest(
            "Either 'query' or 'messages' is required".to_string(),
        ));
    };

    if !request.files.is_empty() {
        let context = codebase_context(&request.files);
        if let Some(last) = messages.last_mut() {
            last.content = with_codebase_context(&context, &query);
        }
    }
    Ok((messages, query))
}

/// `POST /teams/:id/execute`
pub async fn execute_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(request): Json<ExecuteRequest>,
) -> ApiResult<Response> {
    let team = state
        .executor
        .catalog()
        .get(&team_id)
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;
    let team_name = team.display_name.clone();

    let stream = request.stream;
    let (messages, query) = conversation(request)?;
    info!(team = %team_id, stream, "direct team execution");

    if stream {
        let upstream = state
            .executor
            .execute_stream(&team_id, &messages, None)
            .await?;
        return Ok(ndjson_response(upstream));
    }

    let reply = state.executor.execute(&team_id, &messages, None).await?;
    Ok(Json(ExecuteResponse {
        team_id,
        team_name,
        query,
        result: reply.content,
        conversation_length: messages.len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
    .into_response())
}

/// One `{partial_result, full_result}` line per non-empty chunk
fn ndjson_response(upstream: teamgate_core::TextStream) -> Response {
    let lines = ReceiverStream::new(upstream)
        .scan(String::new(), |full, item| {
            let line = match item {
                Ok(chunk) if !chunk.text.is_empty() => {
                    full.push_str(&chunk.text);
                    Some(ExecuteStreamLine {
                        partial_result: chunk.text,
                        full_result: full.clone(),
                    })
                }
                _ => None,
            };
            futures_util::future::ready(Some(line))
        })
        .filter_map(|line| async move {
            let line = line?;
            let mut text = serde_json::to_string(&line).ok()?;
            text.push('\n');
            Some(Ok::<_, Infallible>(text))
        });

    let mut response = Body::from_stream(lines).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/x-ndjson"),
    );
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_from_query() {
        let req: ExecuteRequest = serde_json::from_str(r#"{"query":"hi"}"#).unwrap();
        let (messages, query) = conversation(req).unwrap();
        assert_eq!(messages, vec![Message::user("hi")]);
        assert_eq!(query, "hi");
    }

    #[test]
    fn test_conversation_errors() {
        for body in [r#"{"query":""}"#, r#"{"messages":[]}"#, r#"{}"#] {
            let req: ExecuteRequest = serde_json::from_str(body).unwrap();
            assert!(matches!(conversation(req), Err(ApiError::BadRequest(_))), "{}", body);
        }
    }

    #[test]
    fn test_files_become_codebase_context() {
        let req: ExecuteRequest = serde_json::from_str(
            r#"{"query":"what does main do?","files":{"src/main.rs":"fn main() {}"}}"#,
        )
        .unwrap();
        let (messages, query) = conversation(req).unwrap();
        assert_eq!(query, "what does main do?");
        assert_eq!(messages.len(), 1);
        let content = &messages[0].content;
        assert!(content.starts_with("CODEBASE CONTEXT:\n=== CODEBASE ANALYSIS CONTEXT ==="));
        assert!(content.contains("--- src/main.rs ---\nfn main() {}"));
        assert!(content.contains("USER QUERY: what does main do?"));
    }

    #[test]
    fn test_conversation_uses_last_message() {
        let req: ExecuteRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"a"},{"role":"assistant","content":"b"},{"role":"user","content":"c"}]}"#,
        )
        .unwrap();
        let (messages, query) = conversation(req).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(query, "c");
    }
}
