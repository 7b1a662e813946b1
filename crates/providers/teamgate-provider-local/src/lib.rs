//! Local model backend
//!
//! Talks to an Ollama-compatible daemon over `/api/generate`, either waiting
//! for the whole completion or relaying the NDJSON stream chunk by chunk.
//! Everything stays on the local network; nothing is sent to hosted APIs.

#![warn(clippy::all)]

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use teamgate_core::{
    create_text_stream, AppConfig, GenerationOptions, Result, StreamHandler, TeamgateError,
    TextGenerator, TextStream,
};

pub mod ndjson;
pub use ndjson::NdjsonBuffer;

/// Default daemon address
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model tag
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

const MAX_PROMPT_BYTES: usize = 1_000_000;
const STREAM_BUFFER: usize = 64;

/// Shared HTTP client for connection pooling to the local daemon
static HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

fn get_http_client() -> Arc<Client> {
    HTTP_CLIENT
        .get_or_init(|| {
            let client = Client::builder()
                .pool_max_idle_per_host(16)
                .pool_idle_timeout(Duration::from_secs(300))
                .tcp_keepalive(Duration::from_secs(60))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!("Falling back to default HTTP client: {}", e);
                    Client::new()
                });
            Arc::new(client)
        })
        .clone()
}

/// `/api/generate` request body
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<usize>,
}

/// One `/api/generate` response object (whole reply or one stream line)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for an Ollama-compatible daemon
#[derive(Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    default_model: String,
    timeout: Duration,
    max_response_size: usize,
}

impl OllamaClient {
    /// Create a client; `None` picks the local defaults
    ///
    /// # Errors
    /// Returns a configuration error if the URL or model name is invalid
    pub fn new(base_url: Option<String>, default_model: Option<String>) -> Result<Self> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self::validate_url(&base_url)?;

        let default_model = default_model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self::validate_model_name(&default_model)?;

        Ok(Self {
            client: get_http_client(),
            base_url,
            default_model,
            timeout: Duration::from_secs(60),
            max_response_size: 10 * 1024 * 1024, // 10MB default limit
        })
    }

    /// Client configured from [`AppConfig`]
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            Some(config.ollama_base_url.clone()),
            Some(config.ollama_model.clone()),
        )?
        .with_timeout(Duration::from_secs(config.ollama_timeout_secs)))
    }

    /// Per-request timeout (non-streaming calls and stream setup)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set maximum response size in bytes
    pub fn with_max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = size;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Validate URL format
    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(TeamgateError::config("Base URL cannot be empty"));
        }

        if url.len() > 2048 {
            return Err(TeamgateError::config(
                "URL is too long (max 2048 characters)",
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| TeamgateError::config(format!("Invalid URL '{}': {}", url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(TeamgateError::config(format!(
                "Invalid URL format: '{}'. Must start with http:// or https://",
                url
            )));
        }

        Ok(())
    }

    /// Validate model name (basic sanitization)
    pub fn validate_model_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(TeamgateError::config("Model name cannot be empty"));
        }

        if name.len() > 256 {
            return Err(TeamgateError::config(
                "Model name is too long (max 256 characters)",
            ));
        }

        if name.contains('\0') || name.contains('\n') || name.contains('\r') {
            return Err(TeamgateError::config(
                "Model name contains invalid characters",
            ));
        }

        Ok(())
    }

    fn validate_prompt(prompt: &str) -> Result<()> {
        if prompt.is_empty() {
            return Err(TeamgateError::validation("Prompt cannot be empty"));
        }
        if prompt.len() > MAX_PROMPT_BYTES {
            return Err(TeamgateError::validation("Prompt is too long (max 1MB)"));
        }
        Ok(())
    }

    fn resolve_model(&self, options: &GenerationOptions) -> Result<String> {
        match &options.model {
            Some(m) => {
                Self::validate_model_name(m)?;
                Ok(m.clone())
            }
            None => Ok(self.default_model.clone()),
        }
    }

    fn request_options(options: &GenerationOptions) -> Result<Option<GenerateOptions>> {
        if let Some(temp) = options.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(TeamgateError::validation(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temp
                )));
            }
        }
        if options.temperature.is_none() && options.max_tokens.is_none() {
            return Ok(None);
        }
        Ok(Some(GenerateOptions {
            temperature: options.temperature,
            num_predict: options.max_tokens,
        }))
    }

    async fn post_generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        stream: bool,
    ) -> Result<reqwest::Response> {
        Self::validate_prompt(prompt)?;
        let model = self.resolve_model(options)?;
        let request = GenerateRequest {
            model: &model,
            prompt,
            stream,
            options: Self::request_options(options)?,
        };

        let url = format!("{}/api/generate", self.base_url);
        let mut builder = self.client.post(&url).json(&request);
        if !stream {
            builder = builder.timeout(self.timeout);
        }

        tracing::debug!(model = %model, stream, "sending generate request");
        let resp = builder.send().await.map_err(|e| {
            TeamgateError::model(format!(
                "Ollama API request failed: {}. Check if Ollama is running at {}",
                e, self.base_url
            ))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(TeamgateError::model(format!(
                "Ollama API returned error status {}: {}",
                status, error_text
            )));
        }

        Ok(resp)
    }

    /// Ask the daemon which models it has pulled
    pub async fn list_models(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct Tags {
            #[serde(default)]
            models: Vec<Tag>,
        }
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }

        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TeamgateError::model(format!("Ollama API request failed: {}", e)))?;
        if !resp.status().is_success() {
            return Err(TeamgateError::model(format!(
                "Ollama API returned error status {}",
                resp.status()
            )));
        }
        let tags: Tags = resp.json().await?;
        Ok(tags.models.into_iter().map(|t| t.name).collect())
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let resp = self.post_generate(prompt, options, false).await?;

        let content_length = resp.content_length().unwrap_or(0) as usize;
        if content_length > self.max_response_size {
            return Err(TeamgateError::model(format!(
                "Response too large: {} bytes (max {} bytes)",
                content_length, self.max_response_size
            )));
        }

        let body: GenerateResponse = resp.json().await.map_err(|e| {
            TeamgateError::model(format!(
                "Failed to parse Ollama response: {}. Response may be malformed.",
                e
            ))
        })?;

        if let Some(err) = body.error {
            return Err(TeamgateError::model(format!("Ollama error: {}", err)));
        }

        if body.response.len() > self.max_response_size {
            return Err(TeamgateError::model(format!(
                "Response text too large: {} bytes (max {} bytes)",
                body.response.len(),
                self.max_response_size
            )));
        }

        Ok(body.response)
    }

    async fn generate_stream(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<TextStream> {
        let mut resp = self.post_generate(prompt, options, true).await?;
        let max_response_size = self.max_response_size;

        let (tx, rx) = create_text_stream(STREAM_BUFFER);
        tokio::spawn(async move {
            let handler = StreamHandler::new(tx);
            let mut buffer = NdjsonBuffer::new();
            let mut received = 0usize;

            loop {
                let chunk = match resp.chunk().await {
                    Ok(Some(c)) => c,
                    Ok(None) => break,
                    Err(e) => {
                        let _ = handler
                            .send_error(TeamgateError::model(format!(
                                "Ollama stream interrupted: {}",
                                e
                            )))
                            .await;
                        return;
                    }
                };

                received += chunk.len();
                if received > max_response_size {
                    let _ = handler
                        .send_error(TeamgateError::model(format!(
                            "Response text too large: {} bytes (max {} bytes)",
                            received, max_response_size
                        )))
                        .await;
                    return;
                }

                for line in buffer.push(&chunk) {
                    match relay_line(&handler, &line).await {
                        Relay::Continue => {}
                        Relay::Stop => return,
                    }
                }
            }

            if let Some(line) = buffer.finish() {
                if let Relay::Stop = relay_line(&handler, &line).await {
                    return;
                }
            }
            let _ = handler.finish(String::new()).await;
        });

        Ok(rx)
    }
}

enum Relay {
    Continue,
    Stop,
}

/// Forward one NDJSON line; `Stop` once the stream is complete or dead
async fn relay_line(handler: &StreamHandler, line: &str) -> Relay {
    let obj = match serde_json::from_str::<GenerateResponse>(line) {
        Ok(obj) => obj,
        Err(e) => {
            tracing::debug!("Skipping malformed stream line: {}", e);
            return Relay::Continue;
        }
    };

    if let Some(err) = obj.error {
        let _ = handler
            .send_error(TeamgateError::model(format!("Ollama error: {}", err)))
            .await;
        return Relay::Stop;
    }

    if obj.done {
        let _ = handler.finish(obj.response).await;
        return Relay::Stop;
    }

    if !obj.response.is_empty() && handler.send_chunk(obj.response, false).await.is_err() {
        return Relay::Stop;
    }
    Relay::Continue
}
