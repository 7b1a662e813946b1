//! Seams to the external collaborators: the inference daemon and web search

use crate::streaming::TextStream;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Per-call generation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Override of the backend's default model
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Completion length cap
    pub max_tokens: Option<usize>,
}

/// A model-serving backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Generate the full completion for a prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Generate a completion as a stream of text chunks
    async fn generate_stream(&self, prompt: &str, options: &GenerationOptions)
        -> Result<TextStream>;
}

/// One web search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title
    pub title: String,
    /// Snippet
    pub content: String,
    /// Link
    pub url: String,
}

/// A web search service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Run a query and return the top hits
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}
