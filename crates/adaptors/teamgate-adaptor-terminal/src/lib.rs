//! Interactive terminal chat
//!
//! A line-oriented front-end over the Teamgate HTTP API. Teams are picked
//! per message by keyword routing (`/auto`) or pinned (`/team <id>`);
//! reasoning blocks are shown under each answer unless `/thinking` hides
//! them. Conversations are saved to the server's chat history when it has
//! one, and `/history` and `/open <id>` pick up earlier ones.

#![warn(clippy::all)]

pub mod client;
pub mod command;
pub mod render;

pub use client::{ApiClient, ExecuteReply, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use command::{Command, HELP};
pub use render::render_reply;

use teamgate_core::{ChatSession, Result, SelectionMode, TeamCatalog};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

const HISTORY_DISABLED: &str = "Chat history is not enabled on the server";

/// Outcome of one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show, possibly empty
    Reply(String),
    Quit,
}

/// Chat state plus the API it talks to
pub struct TerminalChat {
    api: ApiClient,
    catalog: TeamCatalog,
    session: ChatSession,
    /// Stop trying to save history after the server says it has none
    history_available: bool,
}

impl TerminalChat {
    pub fn new(api: ApiClient, catalog: TeamCatalog) -> Self {
        let session = ChatSession::new(&catalog);
        Self {
            api,
            catalog,
            session,
            history_available: true,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// One-line status shown before each prompt
    pub fn status_line(&self) -> String {
        let mode = match self.session.mode {
            SelectionMode::Auto => "auto".to_string(),
            SelectionMode::Manual => self.session.selected_team.clone(),
        };
        let thinking = if self.session.show_thinking { "on" } else { "off" };
        format!("[team: {} | reasoning: {}]", mode, thinking)
    }

    fn teams_listing(&self) -> String {
        self.catalog
            .teams()
            .iter()
            .map(|t| {
                let marker = if t.id == self.session.selected_team { "*" } else { " " };
                format!("{} {:<16} {}", marker, t.id, t.display_name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Handle one input line
    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        match Command::parse(line) {
            Command::Empty => Outcome::Reply(String::new()),
            Command::Quit => Outcome::Quit,
            Command::Help => Outcome::Reply(HELP.to_string()),
            Command::Invalid(msg) => Outcome::Reply(msg),
            Command::Teams => Outcome::Reply(self.teams_listing()),
            Command::Auto => {
                self.session.set_auto();
                Outcome::Reply("Auto team selection on".to_string())
            }
            Command::Team(id) => match self.session.select_team(&self.catalog, &id) {
                Ok(()) => Outcome::Reply(format!("Using team {}", id)),
                Err(e) => Outcome::Reply(e.to_string()),
            },
            Command::ToggleThinking => {
                let on = self.session.toggle_thinking();
                Outcome::Reply(format!("Reasoning {}", if on { "shown" } else { "hidden" }))
            }
            Command::New => {
                self.session.clear();
                Outcome::Reply("Started a new conversation".to_string())
            }
            Command::History => Outcome::Reply(self.history().await),
            Command::Open(id) => Outcome::Reply(self.open(id).await),
            Command::Chat(text) => Outcome::Reply(self.chat(&text).await),
        }
    }

    async fn chat(&mut self, text: &str) -> String {
        let team = match self.session.begin_turn(&self.catalog, text) {
            Ok(team) => team,
            Err(e) => return e.to_string(),
        };
        debug!(team = %team, "sending message");

        if self.session.conversation_id.is_none() && self.history_available {
            if let Some(title) = self.session.title() {
                match self.api.create_conversation(&title).await {
                    Ok(Some(id)) => self.session.conversation_id = Some(id),
                    Ok(None) => self.history_available = false,
                    Err(e) => warn!(error = %e, "could not create conversation"),
                }
            }
        }
        self.persist("user", text, None).await;

        match self.api.execute(&team, &self.session.messages).await {
            Ok(ExecuteReply::Answer(raw)) => {
                let reply = self.session.finish_turn(&raw);
                if let Some(stored) = self.session.messages.last().map(|m| m.content.clone()) {
                    self.persist("assistant", &stored, Some(&team)).await;
                }
                render_reply(&team, &reply, self.session.show_thinking)
            }
            Ok(ExecuteReply::Status(code)) => self
                .session
                .end_turn_with(format!("Sorry, I encountered an error: {}", code)),
            Err(e) => {
                let reason = e.to_string();
                self.session.fail_turn(&reason)
            }
        }
    }

    async fn history(&mut self) -> String {
        match self.api.list_conversations().await {
            Ok(Some(list)) if list.is_empty() => "No saved conversations".to_string(),
            Ok(Some(list)) => list
                .iter()
                .map(|c| {
                    let current = self.session.conversation_id == Some(c.id);
                    format!(
                        "{} {:>4}  {}  (updated {})",
                        if current { "*" } else { " " },
                        c.id,
                        c.title,
                        c.updated_at
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Ok(None) => {
                self.history_available = false;
                HISTORY_DISABLED.to_string()
            }
            Err(e) => format!("Could not load conversations: {}", e),
        }
    }

    async fn open(&mut self, id: i64) -> String {
        if self.session.processing {
            return "a response is still being generated".to_string();
        }
        match self.api.conversation_messages(id).await {
            Ok(Some(stored)) => {
                let messages: Vec<_> = stored.iter().filter_map(|m| m.to_message()).collect();
                let count = messages.len();
                self.session.restore(id, messages);
                debug!(conversation_id = id, count, "conversation reopened");
                format!("Opened conversation {} ({} messages)", id, count)
            }
            Ok(None) => format!("Conversation {} not found", id),
            Err(e) => format!("Could not open conversation {}: {}", id, e),
        }
    }

    async fn persist(&self, role: &str, content: &str, model_used: Option<&str>) {
        let Some(id) = self.session.conversation_id else {
            return;
        };
        if let Err(e) = self.api.save_message(id, role, content, model_used).await {
            warn!(error = %e, conversation_id = id, "could not save message");
        }
    }

    /// Read lines from `input` until EOF or `/quit`, writing replies to `output`
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        output
            .write_all(format!("{}\nType /help for commands.\n", self.status_line()).as_bytes())
            .await?;
        output.write_all(b"> ").await?;
        output.flush().await?;

        while let Some(line) = lines.next_line().await? {
            match self.handle_line(&line).await {
                Outcome::Quit => break,
                Outcome::Reply(text) => {
                    if !text.is_empty() {
                        output.write_all(text.as_bytes()).await?;
                        output.write_all(b"\n\n").await?;
                    }
                }
            }
            output
                .write_all(format!("{} > ", self.status_line()).as_bytes())
                .await?;
            output.flush().await?;
        }
        output.write_all(b"\nBye\n").await?;
        output.flush().await?;
        Ok(())
    }
}
