//! Request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use teamgate_core::{GenerationOptions, Message};
use teamgate_plugin_memory::{DEFAULT_MCP_SEARCH_LIMIT, DEFAULT_SEARCH_LIMIT, DEFAULT_USER_ID};

/// Owner reported for every team exposed as a model
pub const MODEL_OWNER: &str = "teamgate";

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_mcp_limit() -> usize {
    DEFAULT_MCP_SEARCH_LIMIT
}

/// Seconds since the epoch
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Whitespace-delimited word count, used as a token estimate
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// ============================================================
// OpenAI-compatible chat
// ============================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// Team id
    pub model: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<usize>,
    #[serde(default)]
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Per-call overrides for the model backend
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            model: None,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: Message,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl Usage {
    /// Word-count estimate over the conversation and the completion
    pub fn estimate(messages: &[Message], completion: &str) -> Self {
        let conversation = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let prompt_tokens = word_count(&conversation);
        let completion_tokens = word_count(completion);
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

/// One `chat.completion.chunk` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    fn new(id: &str, model: &str, delta: ChunkDelta, finish_reason: Option<String>) -> Self {
        Self {
            id: id.to_string(),
            object: "chat.completion.chunk".to_string(),
            created: unix_now(),
            model: model.to_string(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        }
    }

    /// Chunk carrying text
    pub fn content(id: &str, model: &str, text: String) -> Self {
        Self::new(id, model, ChunkDelta { content: Some(text) }, None)
    }

    /// Empty chunk with `finish_reason: "stop"`
    pub fn stop(id: &str, model: &str) -> Self {
        Self::new(id, model, ChunkDelta::default(), Some("stop".to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

impl ModelInfo {
    pub fn team(id: &str) -> Self {
        Self {
            id: id.to_string(),
            object: "model".to_string(),
            created: unix_now(),
            owned_by: MODEL_OWNER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

// ============================================================
// Teams
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    pub name: String,
    pub description: String,
    pub agent_count: usize,
    pub agents: Vec<String>,
    pub keywords: Vec<String>,
    pub search_enabled: bool,
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub team_id: String,
    pub team_name: String,
}

/// Body of `/teams/:id/execute`; exactly one of `query` or `messages`
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub stream: bool,
    /// Source files (path to contents) the question is about
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub team_id: String,
    pub team_name: String,
    pub query: String,
    pub result: String,
    pub conversation_length: usize,
    pub timestamp: String,
}

/// One NDJSON line of a streamed execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteStreamLine {
    pub partial_result: String,
    pub full_result: String,
}

// ============================================================
// Memories
// ============================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UserQuery {
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemorySearchRequest {
    pub query: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct McpAddRequest {
    pub content: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct McpSearchRequest {
    pub query: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_mcp_limit")]
    pub limit: usize,
}

// ============================================================
// Conversations
// ============================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationRequest {
    /// Explicit title
    #[serde(default)]
    pub title: Option<String>,
    /// First user message; the title is derived from it when `title` is absent
    #[serde(default)]
    pub first_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddMessageRequest {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub model_used: Option<String>,
}

/// Free-form JSON object
pub type JsonObject = Map<String, Value>;
