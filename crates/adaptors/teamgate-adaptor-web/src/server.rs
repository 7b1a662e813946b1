//! Router assembly and the HTTP server

use crate::handlers::{chat, conversations, memory, presentations, status, system, teams};
use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use std::future::Future;
use teamgate_core::{AppConfig, Result, TeamgateError};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Serve `/logs` as SSE
    pub logs_enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            logs_enabled: false,
        }
    }
}

impl WebConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.cors_enabled,
            logs_enabled: config.logs_enabled,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the full router for `state`
pub fn build_router(state: AppState) -> Router {
    let enable_cors = state.config.enable_cors;
    let logs_enabled = state.config.logs_enabled;

    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/status", get(status::status))
        .route("/status/cached", get(status::cached_status))
        // OpenAI-compatible surface
        .route("/v1/models", get(system::list_models))
        .route("/v1/models/:id", get(system::get_model))
        .route("/v1/chat/completions", post(chat::chat_completions))
        // Teams
        .route("/teams", get(teams::list_teams))
        .route("/teams/route", post(teams::route_team))
        .route("/teams/:id/execute", post(teams::execute_team))
        // Per-user memory files
        .route(
            "/memories/",
            post(memory::create_memory)
                .get(memory::list_memories)
                .delete(memory::delete_memories),
        )
        .route("/memories/search", post(memory::search_memories))
        // MCP memory store
        .route("/mcp/add_memory", post(memory::mcp_add_memory))
        .route("/mcp/search_memory", post(memory::mcp_search_memory))
        .route(
            "/mcp/memories/:user_id",
            get(memory::mcp_list_memories).delete(memory::mcp_delete_memories),
        )
        // Chat history
        .route(
            "/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route("/conversations/:id", delete(conversations::delete_conversation))
        .route(
            "/conversations/:id/messages",
            get(conversations::list_messages).post(conversations::add_message),
        )
        // Slide decks
        .route("/presentations/generate", post(presentations::generate_presentation))
        .route("/presentations", get(presentations::list_presentations))
        .route("/presentations/:id", get(presentations::get_presentation));

    if logs_enabled {
        router = router.route("/logs", get(system::logs_sse));
    }

    let mut router = router.with_state(state).layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
}

/// HTTP server for the Teamgate API
pub struct WebServer {
    state: AppState,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.state.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TeamgateError::config(format!("Failed to bind to {}: {}", addr, e)))?;
        info!("Starting Teamgate API server on {}", addr);

        let router = self.router();
        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!("Server error: {}", e);
            return Err(e.into());
        }

        info!("Teamgate API server stopped");
        Ok(())
    }
}
