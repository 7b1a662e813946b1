//! Memory record types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use teamgate_core::Message;

/// User id used when a request names none
pub const DEFAULT_USER_ID: &str = "default";

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

/// One stored memory in a per-user file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: String,
    /// Message contents joined by single spaces; what search matches on
    pub content: String,
    pub messages: Vec<Message>,
    pub user_id: String,
    pub agent_id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// ISO-8601 creation time
    pub timestamp: String,
}

/// Request to store a memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMemory {
    pub messages: Vec<Message>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl NewMemory {
    pub fn new(user_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            messages,
            user_id: user_id.into(),
            agent_id: None,
            metadata: Map::new(),
        }
    }

    /// Text the entry will be searched by
    pub fn content(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One memory in the single-file MCP store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpMemory {
    pub content: String,
    /// 1-based position in the user's list at insert time, as text
    pub timestamp: String,
}
