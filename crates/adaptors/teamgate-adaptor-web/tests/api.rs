//! HTTP API tests through `tower::ServiceExt::oneshot` with a stub backend

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use teamgate_adaptor_web::{
    build_router, AppState, Health, ServiceTarget, StatusMonitor, WebConfig,
};
use teamgate_core::{
    create_text_stream, GenerationOptions, PromptBuilder, Result, TeamCatalog, TeamExecutor,
    TeamgateError, TextChunk, TextGenerator, TextStream,
};
use teamgate_plugin_memory::{JsonFileMemoryStore, McpMemoryStore};
use teamgate_plugin_presentation::PresentationService;
use teamgate_storage_sql::SqliteConversationStore;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers every prompt with fixed text; streams it in fixed pieces
struct StubGenerator {
    reply: Option<String>,
    chunks: Vec<String>,
}

impl StubGenerator {
    fn answering(reply: &str, chunks: &[&str]) -> Self {
        Self {
            reply: Some(reply.to_string()),
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn offline() -> Self {
        Self {
            reply: None,
            chunks: Vec::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        self.reply
            .clone()
            .ok_or_else(|| TeamgateError::model("Ollama API request failed: connection refused"))
    }

    async fn generate_stream(&self, _prompt: &str, _options: &GenerationOptions) -> Result<TextStream> {
        if self.reply.is_none() {
            return Err(TeamgateError::model("connection refused"));
        }
        let (tx, rx) = create_text_stream(16);
        let chunks = self.chunks.clone();
        tokio::spawn(async move {
            for c in chunks {
                let _ = tx.send(Ok(TextChunk::partial(c))).await;
            }
            let _ = tx.send(Ok(TextChunk::last(""))).await;
        });
        Ok(rx)
    }
}

struct Harness {
    router: Router,
    _dir: tempfile::TempDir,
}

fn base_state(generator: Arc<dyn TextGenerator>, dir: &std::path::Path) -> AppState {
    let executor = TeamExecutor::new(
        Arc::new(TeamCatalog::builtin()),
        PromptBuilder::new().unwrap(),
        generator,
    );
    AppState::new(
        Arc::new(executor),
        Arc::new(JsonFileMemoryStore::new(dir)),
        Arc::new(McpMemoryStore::new(dir)),
        WebConfig::default(),
    )
}

async fn harness_with(generator: StubGenerator, with_history: bool) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let mut state = base_state(Arc::new(generator), dir.path());
    if with_history {
        let store = SqliteConversationStore::new("sqlite::memory:").await.unwrap();
        state = state.with_conversations(Arc::new(store));
    }
    Harness {
        router: build_router(state),
        _dir: dir,
    }
}

async fn harness() -> Harness {
    harness_with(
        StubGenerator::answering(
            "<thinking>plan</thinking><b>Answer</b> text",
            &["<thinking>plan</thinking>", "Ans", "<i>wer</i>"],
        ),
        true,
    )
    .await
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send(router, method, uri, body).await;
    (status, serde_json::from_str(&text).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_and_root() {
    let h = harness().await;
    let (status, body) = send_json(&h.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["available_teams"], 5);

    let (_, body) = send_json(&h.router, "GET", "/", None).await;
    assert_eq!(body["available_teams"][0], "Research");
    assert_eq!(body["backend"], "stub");
}

#[tokio::test]
async fn test_models() {
    let h = harness().await;
    let (status, body) = send_json(&h.router, "GET", "/v1/models", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"], "list");
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["Research", "coding-team", "business-team", "CreativeStudio", "SalesOps"]
    );
    assert_eq!(body["data"][0]["object"], "model");

    let (status, body) = send_json(&h.router, "GET", "/v1/models/SalesOps", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "SalesOps");

    let (status, body) = send_json(&h.router, "GET", "/v1/models/gpt-4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Model not found");
}

#[tokio::test]
async fn test_chat_completion() {
    let h = harness().await;
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/v1/chat/completions",
        Some(json!({
            "model": "coding-team",
            "messages": [{"role": "system", "content": "be brief"}, {"role": "user", "content": "fix my build please"}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"], "chat.completion");
    assert!(body["id"].as_str().unwrap().starts_with("chatcmpl-"));
    assert_eq!(body["model"], "coding-team");
    assert_eq!(body["choices"][0]["message"]["role"], "assistant");
    assert_eq!(
        body["choices"][0]["message"]["content"],
        "<thinking>plan</thinking>Answer text"
    );
    assert_eq!(body["choices"][0]["finish_reason"], "stop");
    assert_eq!(body["usage"]["prompt_tokens"], 6);
    assert_eq!(body["usage"]["completion_tokens"], 2);
    assert_eq!(body["usage"]["total_tokens"], 8);
}

#[tokio::test]
async fn test_chat_completion_validation() {
    let h = harness().await;
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/v1/chat/completions",
        Some(json!({"model": "gpt-4", "messages": [{"role": "user", "content": "hi"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Unknown model: gpt-4");

    let (status, body) = send_json(
        &h.router,
        "POST",
        "/v1/chat/completions",
        Some(json!({"model": "Research", "messages": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "No messages provided");
}

#[tokio::test]
async fn test_model_failure_is_a_fallback_answer() {
    let h = harness_with(StubGenerator::offline(), false).await;
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/v1/chat/completions",
        Some(json!({"model": "coding-team", "messages": [{"role": "user", "content": "fix it"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let content = body["choices"][0]["message"]["content"].as_str().unwrap();
    assert!(content.contains("regarding 'fix it'"), "{}", content);
    assert!(content.ends_with("the AI model is currently unavailable for detailed analysis."));
}

#[tokio::test]
async fn test_chat_completion_stream() {
    let h = harness().await;
    let (status, body) = send(
        &h.router,
        "POST",
        "/v1/chat/completions",
        Some(json!({
            "model": "coding-team",
            "stream": true,
            "messages": [{"role": "user", "content": "hello"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.ends_with("data: [DONE]\n\n"), "{:?}", body);

    let events: Vec<Value> = body
        .split("\n\n")
        .filter_map(|e| e.strip_prefix("data: "))
        .filter(|d| *d != "[DONE]")
        .map(|d| serde_json::from_str(d).unwrap())
        .collect();

    let text: String = events
        .iter()
        .filter_map(|e| e["choices"][0]["delta"]["content"].as_str())
        .collect();
    assert_eq!(text, "<thinking>plan</thinking>Answer");

    let last = events.last().unwrap();
    assert_eq!(last["choices"][0]["finish_reason"], "stop");
    assert_eq!(last["choices"][0]["delta"], json!({}));
    assert!(events
        .iter()
        .all(|e| e["object"] == "chat.completion.chunk" && e["id"] == events[0]["id"]));
}

#[tokio::test]
async fn test_stream_with_offline_model_still_terminates() {
    let h = harness_with(StubGenerator::offline(), false).await;
    let (status, body) = send(
        &h.router,
        "POST",
        "/v1/chat/completions",
        Some(json!({"model": "Research", "stream": true, "messages": [{"role": "user", "content": "q"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Error getting response from"));
    assert!(body.ends_with("data: [DONE]\n\n"));
}

#[tokio::test]
async fn test_teams_listing_and_routing() {
    let h = harness().await;
    let (_, body) = send_json(&h.router, "GET", "/teams", None).await;
    assert_eq!(body["teams"]["Research"]["name"], "Research Team");
    assert_eq!(body["teams"]["Research"]["is_default"], true);
    assert_eq!(body["teams"].as_object().unwrap().len(), 5);

    let (_, body) = send_json(
        &h.router,
        "POST",
        "/teams/route",
        Some(json!({"text": "please research the competitor landscape"})),
    )
    .await;
    assert_eq!(body["team_id"], "Research");

    let (_, body) = send_json(
        &h.router,
        "POST",
        "/teams/route",
        Some(json!({"text": "Draft a renewal proposal for the client"})),
    )
    .await;
    assert_eq!(body["team_id"], "SalesOps");

    let (_, body) = send_json(
        &h.router,
        "POST",
        "/teams/route",
        Some(json!({"text": "unrelated gibberish xyz"})),
    )
    .await;
    assert_eq!(body["team_id"], "Research");
}

#[tokio::test]
async fn test_execute_team() {
    let h = harness().await;
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/teams/coding-team/execute",
        Some(json!({"query": "write a parser"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team_id"], "coding-team");
    assert_eq!(body["team_name"], "Software Development Team");
    assert_eq!(body["query"], "write a parser");
    assert_eq!(body["result"], "<thinking>plan</thinking>Answer text");
    assert_eq!(body["conversation_length"], 1);

    let (status, body) = send_json(
        &h.router,
        "POST",
        "/teams/nope/execute",
        Some(json!({"query": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Team not found");

    let (status, body) =
        send_json(&h.router, "POST", "/teams/Research/execute", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Either 'query' or 'messages' is required");
}

#[tokio::test]
async fn test_execute_team_with_codebase_files() {
    let h = harness().await;
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/teams/coding-team/execute",
        Some(json!({
            "query": "where is the entry point?",
            "files": {"src/main.rs": "fn main() {}"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "where is the entry point?");
    assert_eq!(body["conversation_length"], 1);
}

#[tokio::test]
async fn test_execute_team_stream_ndjson() {
    let h = harness().await;
    let (status, body) = send(
        &h.router,
        "POST",
        "/teams/coding-team/execute",
        Some(json!({"messages": [{"role": "user", "content": "go"}], "stream": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let lines: Vec<Value> = body
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1]["partial_result"], "Ans");
    assert_eq!(lines[2]["full_result"], "<thinking>plan</thinking>Answer");
}

#[tokio::test]
async fn test_memory_endpoints() {
    let h = harness().await;
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/memories/",
        Some(json!({
            "messages": [{"role": "user", "content": "I prefer Rust"}],
            "user_id": "alice",
            "metadata": {"topic": "languages"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["results"][0]["content"], "I prefer Rust");
    assert_eq!(body["results"][0]["metadata"]["topic"], "languages");

    // user_id defaults to "default"
    send_json(
        &h.router,
        "POST",
        "/memories/",
        Some(json!({"messages": [{"role": "user", "content": "anonymous note"}]})),
    )
    .await;
    let (_, body) = send_json(&h.router, "GET", "/memories/", None).await;
    assert_eq!(body["results"][0]["user_id"], "default");

    let (_, body) = send_json(&h.router, "GET", "/memories/?user_id=alice", None).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    let (_, body) = send_json(
        &h.router,
        "POST",
        "/memories/search",
        Some(json!({"query": "RUST", "user_id": "alice"})),
    )
    .await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    let (_, body) = send_json(&h.router, "DELETE", "/memories/?user_id=alice", None).await;
    assert_eq!(body, json!({"status": "success", "message": "Memories deleted"}));
    let (_, body) = send_json(&h.router, "GET", "/memories/?user_id=alice", None).await;
    assert!(body["results"].as_array().unwrap().is_empty());

    let (status, _) = send_json(&h.router, "GET", "/memories/?user_id=..", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mcp_endpoints() {
    let h = harness().await;
    let (_, body) = send_json(
        &h.router,
        "POST",
        "/mcp/add_memory",
        Some(json!({"content": "Meeting on Friday", "user_id": "bob"})),
    )
    .await;
    assert_eq!(
        body,
        json!({"status": "success", "message": "Memory added successfully", "user_id": "bob"})
    );

    let (_, body) = send_json(
        &h.router,
        "POST",
        "/mcp/search_memory",
        Some(json!({"query": "friday", "user_id": "bob"})),
    )
    .await;
    assert_eq!(body["results"][0]["timestamp"], "1");
    assert_eq!(body["user_id"], "bob");

    let (_, body) = send_json(&h.router, "GET", "/mcp/memories/bob", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["memories"][0]["content"], "Meeting on Friday");

    let (_, body) = send_json(&h.router, "DELETE", "/mcp/memories/bob", None).await;
    assert_eq!(body["message"], "All memories deleted for user bob");
    let (_, body) = send_json(&h.router, "DELETE", "/mcp/memories/bob", None).await;
    assert_eq!(body["message"], "No memories found for user bob");
}

#[tokio::test]
async fn test_conversation_endpoints() {
    let h = harness().await;
    let long = "Please analyze the quarterly revenue figures for the northern region";
    let (status, conv) = send_json(
        &h.router,
        "POST",
        "/conversations",
        Some(json!({"first_message": long})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let title = conv["title"].as_str().unwrap();
    assert!(title.ends_with("..."));
    assert_eq!(title.chars().count(), 53);

    let id = conv["id"].as_i64().unwrap();
    let uri = format!("/conversations/{}/messages", id);
    let (status, _) = send_json(
        &h.router,
        "POST",
        &uri,
        Some(json!({"role": "assistant", "content": "Done", "model_used": "Research"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, messages) = send_json(&h.router, "GET", &uri, None).await;
    assert_eq!(messages[0]["model_used"], "Research");

    let (_, list) = send_json(&h.router, "GET", "/conversations", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send_json(&h.router, "GET", "/conversations/999/messages", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.router, "DELETE", &format!("/conversations/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_conversations_disabled_without_store() {
    let h = harness_with(StubGenerator::offline(), false).await;
    let (status, body) = send_json(&h.router, "GET", "/conversations", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Chat history is not enabled");
}

#[tokio::test]
async fn test_logs_route_only_when_enabled() {
    let h = harness().await;
    let (status, _) = send(&h.router, "GET", "/logs", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

const DECK_REPLY: &str = r#"<thinking>two slides</thinking>{"title":"Ferries","slides":[{"title":"Routes","content":["North","South"],"notes":"map"},{"title":"Fares"}]}"#;

#[tokio::test]
async fn test_presentation_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let generator: Arc<dyn TextGenerator> = Arc::new(StubGenerator::answering(DECK_REPLY, &[]));
    let state = base_state(generator.clone(), dir.path())
        .with_presentations(Arc::new(PresentationService::new(generator, dir.path())));
    let router = build_router(state);

    let (status, body) = send_json(
        &router,
        "POST",
        "/presentations/generate",
        Some(json!({"topic": "Island ferries", "slides": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["presentation"]["title"], "Ferries");
    assert_eq!(body["presentation"]["slides"][1]["content"], json!([]));
    let id = body["presentation_id"].as_str().unwrap().to_string();

    let (status, deck) = send_json(&router, "GET", &format!("/presentations/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deck["slides"][0]["notes"], "map");

    let (_, list) = send_json(&router, "GET", "/presentations", None).await;
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["slide_count"], 2);

    let (status, body) = send_json(&router, "POST", "/presentations/generate", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Topic is required");

    let (status, body) = send_json(&router, "GET", "/presentations/..%2Fsecret", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Presentation not found");
}

#[tokio::test]
async fn test_presentations_disabled_without_service() {
    let h = harness().await;
    let (status, body) = send_json(&h.router, "GET", "/presentations", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Presentations are not enabled");
}

#[tokio::test]
async fn test_status_rollup_and_cache() {
    let ollama = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&ollama)
        .await;
    let searxng = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&searxng)
        .await;

    let monitor = Arc::new(
        StatusMonitor::new(vec![
            ServiceTarget::http(
                "Ollama",
                "AI Services",
                "inference",
                format!("{}/api/tags", ollama.uri()),
            ),
            ServiceTarget::http("SearxNG", "Search", "metasearch", searxng.uri()),
        ])
        .with_service(ServiceTarget::local("Chat history", "Storage", "SQLite")),
    );
    let dir = tempfile::tempdir().unwrap();
    let state = base_state(Arc::new(StubGenerator::offline()), dir.path()).with_status(monitor);
    let router = build_router(state);

    let (status, body) = send_json(&router, "GET", "/status/cached", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Status cache not ready");

    let (status, body) = send_json(&router, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall"]["status"], "degraded");
    assert_eq!(body["overall"]["healthy"], 2);
    assert_eq!(body["overall"]["unhealthy"], 1);
    assert_eq!(body["services"][0]["status_code"], 200);
    assert_eq!(body["services"][1]["status"], "unhealthy");
    assert_eq!(body["categories"]["Search"][0], "SearxNG");

    let (status, cached) = send_json(&router, "GET", "/status/cached", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached["overall"], body["overall"]);
}

#[tokio::test]
async fn test_status_unhealthy_when_half_are_down() {
    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&down)
        .await;
    let up = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&up)
        .await;

    let monitor = StatusMonitor::new(vec![
        ServiceTarget::http("Up", "A", "answers 404", up.uri()),
        ServiceTarget::http("Down", "A", "answers 500", down.uri()),
    ]);
    let report = monitor.check_all().await;
    assert_eq!(report.overall.status, Health::Unhealthy);
    assert_eq!(report.services[0].status, Health::Healthy);
    assert!(monitor.cached().await.is_none());
}
