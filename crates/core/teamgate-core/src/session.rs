//! Per-conversation chat state for front-ends

use crate::catalog::TeamCatalog;
use crate::sanitize::strip_tags_except_thinking;
use crate::segment::{segment, SegmentedResponse};
use crate::types::{Message, TeamId};
use crate::{Result, TeamgateError};
use serde::{Deserialize, Serialize};

const TITLE_MAX_CHARS: usize = 50;

/// How the answering team is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Route every message by keywords
    Auto,
    /// Always use the selected team
    Manual,
}

/// Title for a new conversation, from its first message
pub fn conversation_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

/// State of one chat: mode, team, history and display flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub mode: SelectionMode,
    pub selected_team: TeamId,
    pub messages: Vec<Message>,
    pub show_thinking: bool,
    pub processing: bool,
    /// Id of the persisted conversation, once created
    pub conversation_id: Option<i64>,
}

impl ChatSession {
    /// Fresh session in auto mode, pre-selecting the catalog default
    pub fn new(catalog: &TeamCatalog) -> Self {
        Self {
            mode: SelectionMode::Auto,
            selected_team: catalog.default_team().id.clone(),
            messages: Vec::new(),
            show_thinking: true,
            processing: false,
            conversation_id: None,
        }
    }

    /// Switch to keyword routing
    pub fn set_auto(&mut self) {
        self.mode = SelectionMode::Auto;
    }

    /// Pin a team and switch to manual mode
    pub fn select_team(&mut self, catalog: &TeamCatalog, team_id: &str) -> Result<()> {
        let team = catalog
            .get(team_id)
            .ok_or_else(|| TeamgateError::not_found(format!("Team '{}' not found", team_id)))?;
        self.selected_team = team.id.clone();
        self.mode = SelectionMode::Manual;
        Ok(())
    }

    pub fn toggle_thinking(&mut self) -> bool {
        self.show_thinking = !self.show_thinking;
        self.show_thinking
    }

    /// Team that would answer `text` right now
    pub fn resolve_team(&self, catalog: &TeamCatalog, text: &str) -> TeamId {
        match self.mode {
            SelectionMode::Auto => catalog.route(text).id.clone(),
            SelectionMode::Manual => self.selected_team.clone(),
        }
    }

    /// Record a user message and pick the team for it.
    ///
    /// Fails while a previous turn is still in flight or when the text is
    /// blank.
    pub fn begin_turn(&mut self, catalog: &TeamCatalog, text: &str) -> Result<TeamId> {
        if self.processing {
            return Err(TeamgateError::validation(
                "a response is still being generated",
            ));
        }
        if text.trim().is_empty() {
            return Err(TeamgateError::validation("message is empty"));
        }

        let team = self.resolve_team(catalog, text);
        if self.mode == SelectionMode::Auto {
            self.selected_team = team.clone();
        }
        self.messages.push(Message::user(text));
        self.processing = true;
        Ok(team)
    }

    /// Record the team's answer. Markup other than reasoning markers is
    /// dropped before storing.
    pub fn finish_turn(&mut self, raw_reply: &str) -> SegmentedResponse {
        let content = strip_tags_except_thinking(raw_reply).trim().to_string();
        let segmented = segment(&content);
        self.messages.push(Message::assistant(content));
        self.processing = false;
        segmented
    }

    /// Record a failed turn as an apology from the assistant
    pub fn fail_turn(&mut self, reason: &str) -> String {
        self.end_turn_with(format!("Sorry, I couldn't process your request: {}", reason))
    }

    /// End the turn with a fixed assistant message, stored as-is
    pub fn end_turn_with(&mut self, text: impl Into<String>) -> String {
        let text = text.into();
        self.messages.push(Message::assistant(text.clone()));
        self.processing = false;
        text
    }

    /// Title for persisting this conversation
    pub fn title(&self) -> Option<String> {
        self.messages
            .iter()
            .find(|m| m.role == crate::types::Role::User)
            .map(|m| conversation_title(&m.content))
    }

    /// Continue a persisted conversation with `messages` as the history
    pub fn restore(&mut self, conversation_id: i64, messages: Vec<Message>) {
        self.messages = messages;
        self.processing = false;
        self.conversation_id = Some(conversation_id);
    }

    /// Forget the history and start a new conversation
    pub fn clear(&mut self) {
        self.messages.clear();
        self.processing = false;
        self.conversation_id = None;
    }
}
