//! Persisted chat history

use crate::types::{Message, Role};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A stored conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339; bumped by every appended message
    pub updated_at: String,
}

/// A message inside a stored conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub conversation_id: i64,
    pub role: String,
    pub content: String,
    /// Team or model that produced an assistant message
    pub model_used: Option<String>,
    pub timestamp: String,
}

impl StoredMessage {
    /// The chat message this row holds; `None` for an unknown role
    pub fn to_message(&self) -> Option<Message> {
        Role::parse(&self.role).map(|role| Message {
            role,
            content: self.content.clone(),
        })
    }
}

/// Chat history storage
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a conversation and return it
    async fn create_conversation(&self, title: &str) -> Result<Conversation>;

    /// All conversations, most recently updated first
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// One conversation, if it exists
    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>>;

    /// Append a message and bump the conversation's `updated_at`.
    /// Fails with `NotFound` for an unknown conversation.
    async fn add_message(
        &self,
        conversation_id: i64,
        role: &str,
        content: &str,
        model_used: Option<&str>,
    ) -> Result<StoredMessage>;

    /// Messages of a conversation in insertion order
    async fn messages(&self, conversation_id: i64) -> Result<Vec<StoredMessage>>;

    /// Delete a conversation and its messages; `false` if it did not exist
    async fn delete_conversation(&self, id: i64) -> Result<bool>;
}
