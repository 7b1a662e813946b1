//! Shared handler state

use crate::server::WebConfig;
use crate::status::StatusMonitor;
use std::sync::Arc;
use std::time::Instant;
use teamgate_core::{ConversationStore, TeamExecutor};
use teamgate_plugin_memory::{JsonFileMemoryStore, McpMemoryStore};
use teamgate_plugin_presentation::PresentationService;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<TeamExecutor>,
    pub memories: Arc<JsonFileMemoryStore>,
    pub mcp: Arc<McpMemoryStore>,
    /// Chat history; the `/conversations` routes answer 404 without it
    pub conversations: Option<Arc<dyn ConversationStore>>,
    /// Slide decks; `/presentations` answers 404 without it
    pub presentations: Option<Arc<PresentationService>>,
    /// Collaborator health; `/status` answers 404 without it
    pub status: Option<Arc<StatusMonitor>>,
    pub config: Arc<WebConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        executor: Arc<TeamExecutor>,
        memories: Arc<JsonFileMemoryStore>,
        mcp: Arc<McpMemoryStore>,
        config: WebConfig,
    ) -> Self {
        Self {
            executor,
            memories,
            mcp,
            conversations: None,
            presentations: None,
            status: None,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn with_conversations(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.conversations = Some(store);
        self
    }

    pub fn with_presentations(mut self, service: Arc<PresentationService>) -> Self {
        self.presentations = Some(service);
        self
    }

    pub fn with_status(mut self, monitor: Arc<StatusMonitor>) -> Self {
        self.status = Some(monitor);
        self
    }
}
