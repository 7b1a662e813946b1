//! Prompt assembly for a team's primary agent

use crate::templates::{TemplateEngine, TEAM_PROMPT};
use crate::types::{last_user_message, render_history, Message, SearchHit, TeamConfig, WebSearch};
use crate::{Result, TeamgateError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Characters of search output kept in a prompt
pub const SEARCH_BLOCK_MAX_CHARS: usize = 1000;

/// Results kept when formatting search hits
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Text used when a search returns nothing
pub const NO_SEARCH_RESULTS: &str = "No search results found.";

/// Format hits as `**title**\ncontent\nURL: url\n` entries, newline separated
pub fn format_search_hits(hits: &[SearchHit], limit: usize) -> String {
    if hits.is_empty() {
        return NO_SEARCH_RESULTS.to_string();
    }
    hits.iter()
        .take(limit)
        .map(|h| format!("**{}**\n{}\nURL: {}\n", h.title, h.content, h.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text that stands in for search results when the search failed
pub fn search_failure_text(err: &TeamgateError) -> String {
    match err {
        TeamgateError::Search(msg) => msg.clone(),
        other => format!("Search failed: {}", other),
    }
}

/// Run a search and always come back with text
pub async fn research_block(search: &dyn WebSearch, query: &str) -> String {
    match search.search(query).await {
        Ok(hits) => format_search_hits(&hits, DEFAULT_SEARCH_RESULTS),
        Err(e) => {
            tracing::warn!(error = %e, "web search failed");
            search_failure_text(&e)
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Render the team prompt.
///
/// `search_block` is only used for search-enabled teams and is cut to
/// [`SEARCH_BLOCK_MAX_CHARS`].
pub fn assemble(
    engine: &TemplateEngine,
    messages: &[Message],
    team: &TeamConfig,
    search_block: Option<&str>,
) -> Result<String> {
    let agent = team.primary_agent().ok_or_else(|| {
        TeamgateError::validation(format!("team '{}' has no agents", team.id))
    })?;

    let mut data: HashMap<String, Value> = HashMap::new();
    data.insert("agent_name".into(), Value::String(agent.name.clone()));
    data.insert("agent_role".into(), Value::String(agent.role.clone()));
    data.insert("agent_goal".into(), Value::String(agent.goal.clone()));
    data.insert(
        "agent_backstory".into(),
        Value::String(agent.backstory.clone()),
    );
    data.insert("team_name".into(), Value::String(team.display_name.clone()));
    data.insert(
        "instructions".into(),
        Value::String(team.instructions.clone()),
    );
    data.insert("history".into(), Value::String(render_history(messages)));
    data.insert(
        "question".into(),
        Value::String(last_user_message(messages).unwrap_or_default().to_string()),
    );

    if team.search_enabled() {
        if let Some(block) = search_block {
            data.insert(
                "search_block".into(),
                Value::String(truncate_chars(block, SEARCH_BLOCK_MAX_CHARS).to_string()),
            );
        }
    }

    engine.render_named(TEAM_PROMPT, &data)
}

/// Builds prompts, fetching web research for search-enabled teams
pub struct PromptBuilder {
    engine: TemplateEngine,
    search: Option<Arc<dyn WebSearch>>,
}

impl PromptBuilder {
    /// Builder without web search
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::with_builtin_templates()?,
            search: None,
        })
    }

    /// Attach a search service
    pub fn with_search(mut self, search: Arc<dyn WebSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Whether a search service is attached
    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    /// Assemble without any search
    pub fn assemble(
        &self,
        messages: &[Message],
        team: &TeamConfig,
        search_block: Option<&str>,
    ) -> Result<String> {
        assemble(&self.engine, messages, team, search_block)
    }

    /// Assemble, running a search on the latest user message first when the
    /// team is search-enabled
    pub async fn build(&self, messages: &[Message], team: &TeamConfig) -> Result<String> {
        let question = last_user_message(messages).unwrap_or_default();

        let search_block = match (&self.search, team.search_enabled()) {
            (Some(search), true) if !question.trim().is_empty() => {
                tracing::debug!(team = %team.id, "fetching research for prompt");
                Some(research_block(search.as_ref(), question).await)
            }
            _ => None,
        };

        self.assemble(messages, team, search_block.as_deref())
    }
}
