//! Team execution: prompt, one model call, cleanup
//!
//! A team "runs" as a single call on behalf of its primary agent. Model
//! failures never escape as errors; the caller gets a fallback answer (or, for
//! streams, an error chunk) instead.

use crate::catalog::TeamCatalog;
use crate::prompt::PromptBuilder;
use crate::sanitize::{clean_chunk, clean_model_output};
use crate::segment::{segment, SegmentedResponse};
use crate::streaming::{create_text_stream, StreamHandler, TextStream};
use crate::types::{
    last_user_message, AgentProfile, GenerationOptions, Message, TeamConfig, TextGenerator,
};
use crate::{Result, TeamgateError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

const STREAM_BUFFER: usize = 64;

/// Answer used when the model backend is unavailable
pub fn fallback_answer(agent: &AgentProfile, query: &str) -> String {
    format!(
        "As a {}, I would focus on {} regarding '{}'. However, the AI model is currently unavailable for detailed analysis.",
        agent.role,
        agent.goal.to_lowercase(),
        query
    )
}

/// Text of the chunk emitted when a stream breaks
pub fn stream_error_text(agent: &AgentProfile, err: &TeamgateError) -> String {
    format!("Error getting response from {}: {}\n", agent.role, err)
}

/// Result of one team execution
#[derive(Debug, Clone, Serialize)]
pub struct TeamReply {
    pub team_id: String,
    pub team_name: String,
    pub query: String,
    /// Cleaned model output, reasoning markers included
    pub content: String,
    /// `content` split into reasoning and answer
    pub segmented: SegmentedResponse,
    /// True when `content` is the fallback answer
    pub fallback: bool,
}

/// Runs teams from a catalog against one model backend
pub struct TeamExecutor {
    catalog: Arc<TeamCatalog>,
    prompts: PromptBuilder,
    generator: Arc<dyn TextGenerator>,
    options: GenerationOptions,
}

impl TeamExecutor {
    pub fn new(
        catalog: Arc<TeamCatalog>,
        prompts: PromptBuilder,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            catalog,
            prompts,
            generator,
            options: GenerationOptions::default(),
        }
    }

    /// Default generation options for every call
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &TeamCatalog {
        &self.catalog
    }

    /// Name of the model backend
    pub fn backend_name(&self) -> &str {
        self.generator.name()
    }

    fn team(&self, team_id: &str) -> Result<(&TeamConfig, &AgentProfile)> {
        let team = self
            .catalog
            .get(team_id)
            .ok_or_else(|| TeamgateError::not_found(format!("Team '{}' not found", team_id)))?;
        let agent = team.primary_agent().ok_or_else(|| {
            TeamgateError::config(format!("team '{}' has no agents", team.id))
        })?;
        Ok((team, agent))
    }

    fn merged_options(&self, overrides: Option<&GenerationOptions>) -> GenerationOptions {
        let mut options = self.options.clone();
        if let Some(o) = overrides {
            if o.model.is_some() {
                options.model = o.model.clone();
            }
            if o.temperature.is_some() {
                options.temperature = o.temperature;
            }
            if o.max_tokens.is_some() {
                options.max_tokens = o.max_tokens;
            }
        }
        options
    }

    /// Run a team on a conversation and wait for the whole answer
    pub async fn execute(
        &self,
        team_id: &str,
        messages: &[Message],
        overrides: Option<&GenerationOptions>,
    ) -> Result<TeamReply> {
        let (team, agent) = self.team(team_id)?;
        let query = last_user_message(messages).unwrap_or_default().to_string();
        info!(team = %team.id, backend = self.generator.name(), "executing team");

        let prompt = self.prompts.build(messages, team).await?;
        let options = self.merged_options(overrides);

        let (content, fallback) = match self.generator.generate(&prompt, &options).await {
            Ok(raw) => (clean_model_output(&raw), false),
            Err(e) => {
                error!(team = %team.id, error = %e, "model request failed");
                (fallback_answer(agent, &query), true)
            }
        };

        Ok(TeamReply {
            team_id: team.id.clone(),
            team_name: team.display_name.clone(),
            query,
            segmented: segment(&content),
            content,
            fallback,
        })
    }

    /// Run a team and stream cleaned chunks as they arrive.
    ///
    /// The stream always ends with a final (possibly empty) chunk. Backend
    /// failures become one error chunk before it.
    pub async fn execute_stream(
        &self,
        team_id: &str,
        messages: &[Message],
        overrides: Option<&GenerationOptions>,
    ) -> Result<TextStream> {
        let (team, agent) = self.team(team_id)?;
        info!(team = %team.id, backend = self.generator.name(), "streaming team");

        let prompt = self.prompts.build(messages, team).await?;
        let options = self.merged_options(overrides);
        let agent = agent.clone();
        let generator = Arc::clone(&self.generator);

        let (tx, rx) = create_text_stream(STREAM_BUFFER);
        tokio::spawn(async move {
            let handler = StreamHandler::new(tx);

            match generator.generate_stream(&prompt, &options).await {
                Ok(mut upstream) => {
                    while let Some(item) = upstream.recv().await {
                        match item {
                            Ok(chunk) => {
                                let text = clean_chunk(&chunk.text);
                                if !text.is_empty()
                                    && handler.send_chunk(text, false).await.is_err()
                                {
                                    // client went away
                                    return;
                                }
                                if chunk.is_final {
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "model stream broke");
                                let _ = handler
                                    .send_chunk(stream_error_text(&agent, &e), false)
                                    .await;
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "model stream request failed");
                    let _ = handler
                        .send_chunk(stream_error_text(&agent, &e), false)
                        .await;
                }
            }

            let _ = handler.finish(String::new()).await;
        });

        Ok(rx)
    }
}
