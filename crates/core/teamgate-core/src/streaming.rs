//! Streaming response support

use crate::{Result, TeamgateError};
use tokio::sync::mpsc;

/// Streaming text chunk
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Chunk text
    pub text: String,
    /// Whether this is the final chunk
    pub is_final: bool,
}

impl TextChunk {
    /// Intermediate chunk
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    /// Last chunk of a stream
    pub fn last(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Stream of text chunks
pub type TextStream = mpsc::Receiver<Result<TextChunk>>;

/// Stream sender
pub type TextStreamSender = mpsc::Sender<Result<TextChunk>>;

/// Create a new text stream
pub fn create_text_stream(buffer_size: usize) -> (TextStreamSender, TextStream) {
    mpsc::channel(buffer_size)
}

/// Streaming response handler
pub struct StreamHandler {
    sender: TextStreamSender,
}

impl StreamHandler {
    /// Create a new stream handler
    pub fn new(sender: TextStreamSender) -> Self {
        Self { sender }
    }

    /// Send a chunk of text
    pub async fn send_chunk(&self, text: String, is_final: bool) -> Result<()> {
        self.sender
            .send(Ok(TextChunk { text, is_final }))
            .await
            .map_err(|e| TeamgateError::other(format!("Failed to send chunk: {}", e)))
    }

    /// Send an error
    pub async fn send_error(&self, error: TeamgateError) -> Result<()> {
        self.sender
            .send(Err(error))
            .await
            .map_err(|e| TeamgateError::other(format!("Failed to send error: {}", e)))
    }

    /// Send final chunk and close stream
    pub async fn finish(&self, text: String) -> Result<()> {
        self.send_chunk(text, true).await
    }
}

/// Collect all chunks from a stream into a single string
pub async fn collect_stream(mut stream: TextStream) -> Result<String> {
    let mut result = String::new();

    while let Some(chunk_result) = stream.recv().await {
        let chunk = chunk_result?;
        result.push_str(&chunk.text);

        if chunk.is_final {
            break;
        }
    }

    Ok(result)
}
