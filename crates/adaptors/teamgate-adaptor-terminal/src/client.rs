//! HTTP client for the Teamgate API

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use teamgate_core::{Conversation, Message, Result, StoredMessage, TeamgateError};

/// Default API address
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default request timeout; team answers can take a while
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Result of a team execution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteReply {
    /// The team's raw result text
    Answer(String),
    /// The server answered with a non-success status
    Status(u16),
}

#[derive(Debug, Deserialize)]
struct ExecuteBody {
    #[serde(default)]
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdBody {
    id: i64,
}

/// Talks to a running Teamgate server
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run `team_id` on the conversation
    pub async fn execute(&self, team_id: &str, messages: &[Message]) -> Result<ExecuteReply> {
        let url = format!("{}/teams/{}/execute", self.base_url, team_id);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "messages": messages }))
            .send()
            .await
            .map_err(|e| {
                TeamgateError::model(format!(
                    "Teamgate API request failed: {}. Check if the server is running at {}",
                    e, self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Ok(ExecuteReply::Status(status.as_u16()));
        }

        let body: ExecuteBody = response.json().await?;
        Ok(ExecuteReply::Answer(
            body.result
                .unwrap_or_else(|| "No response received".to_string()),
        ))
    }

    /// Persist a new conversation; `None` when chat history is disabled server-side
    pub async fn create_conversation(&self, title: &str) -> Result<Option<i64>> {
        let url = format!("{}/conversations", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "title": title }))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: IdBody = response.error_for_status()?.json().await?;
        Ok(Some(body.id))
    }

    /// Saved conversations, most recent first; `None` when chat history is
    /// disabled server-side
    pub async fn list_conversations(&self) -> Result<Option<Vec<Conversation>>> {
        let url = format!("{}/conversations", self.base_url);
        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.json().await?))
    }

    /// Messages of a saved conversation; `None` when it does not exist or
    /// history is disabled
    pub async fn conversation_messages(
        &self,
        conversation_id: i64,
    ) -> Result<Option<Vec<StoredMessage>>> {
        let url = format!("{}/conversations/{}/messages", self.base_url, conversation_id);
        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.json().await?))
    }

    /// Append a message to a persisted conversation
    pub async fn save_message(
        &self,
        conversation_id: i64,
        role: &str,
        content: &str,
        model_used: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}/conversations/{}/messages", self.base_url, conversation_id);
        self.client
            .post(&url)
            .json(&json!({ "role": role, "content": content, "model_used": model_used }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
