//! Teamgate HTTP API
//!
//! An axum service exposing agent teams through an OpenAI-compatible chat
//! completion API, plus direct team execution, the two memory stores,
//! SQLite chat history, slide decks and collaborator health.
//!
//! # Endpoints
//!
//! - `GET /v1/models`, `POST /v1/chat/completions` (SSE when `stream`)
//! - `GET /teams`, `POST /teams/route`, `POST /teams/:id/execute` (NDJSON when `stream`)
//! - `/memories/...` per-user memory files, `/mcp/...` single-file store
//! - `/conversations/...` chat history
//! - `POST /presentations/generate`, `GET /presentations`, `GET /presentations/:id`
//! - `GET /health`, `GET /status`, `GET /status/cached`, `GET /logs` (SSE, when enabled)
//!
//! Errors are returned as `{"detail": "..."}` with a matching status code.

#![warn(clippy::all)]

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod status;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use server::{build_router, WebConfig, WebServer};
pub use state::AppState;
pub use status::{Health, ServiceTarget, StatusMonitor, SystemStatus};
