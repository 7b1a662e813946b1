//! Error types for Teamgate core

use thiserror::Error;

/// Main error type for Teamgate operations
#[derive(Debug, Error)]
pub enum TeamgateError {
    /// Configuration error (bad catalog, missing env, invalid URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model/LLM error
    #[error("Model error: {0}")]
    Model(String),

    /// Web search error
    #[error("Search error: {0}")]
    Search(String),

    /// Persistence error (memory files, chat database)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error (generic)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using TeamgateError
pub type Result<T> = std::result::Result<T, TeamgateError>;

impl TeamgateError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        TeamgateError::Config(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        TeamgateError::Model(msg.into())
    }

    /// Create a search error
    pub fn search(msg: impl Into<String>) -> Self {
        TeamgateError::Search(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        TeamgateError::Storage(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        TeamgateError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        TeamgateError::NotFound(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        TeamgateError::Template(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        TeamgateError::Other(msg.into())
    }
}
