//! Teamgate Core
//!
//! Types and pure logic shared by the Teamgate gateway and its front-ends:
//!
//! - Response segmenter splitting `<thinking>` reasoning from answers
//! - Keyword team router and the built-in team catalog
//! - Prompt assembly for a team's primary agent, with optional web research
//!   and codebase context
//! - Team execution against any [`TextGenerator`] backend
//! - Output sanitizing, chat session state, logging and configuration
//!
//! # Example
//!
//! ```no_run
//! use teamgate_core::*;
//!
//! let catalog = TeamCatalog::builtin();
//! let team = catalog.route("please research the competitor landscape");
//! assert_eq!(team.id, "Research");
//!
//! let reply = segment("<thinking>check sources</thinking>Three rivals matter.");
//! assert_eq!(reply.answer, "Three rivals matter.");
//! ```

#![warn(clippy::all)]

pub use uuid::Uuid;

pub mod catalog;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod prompt;
pub mod router;
pub mod sanitize;
pub mod segment;
pub mod session;
pub mod streaming;
pub mod templates;
pub mod types;
pub mod utils;

pub use catalog::{TeamCatalog, STANDARD_INSTRUCTIONS};
pub use config::{get_env_bool, get_env_int, get_env_or, load_env, load_env_from_path, AppConfig};
pub use context::{
    codebase_context, truncate_middle, with_codebase_context, FILE_EDGE_CHARS, MAX_FILE_CHARS,
    NO_CODE_FILES, TRUNCATION_MARKER,
};
pub use engine::{fallback_answer, stream_error_text, TeamExecutor, TeamReply};
pub use error::{Result, TeamgateError};
pub use prompt::{
    assemble, format_search_hits, research_block, search_failure_text, PromptBuilder,
    DEFAULT_SEARCH_RESULTS, NO_SEARCH_RESULTS, SEARCH_BLOCK_MAX_CHARS,
};
pub use router::route;
pub use sanitize::{
    clean_chunk, clean_display_text, clean_model_output, strip_bold_headers, strip_html_tags,
    strip_tags_except_thinking,
};
pub use segment::{segment, split, Piece, SegmentedResponse, THINKING_CLOSE, THINKING_OPEN};
pub use session::{conversation_title, ChatSession, SelectionMode};
pub use streaming::{
    collect_stream, create_text_stream, StreamHandler, TextChunk, TextStream, TextStreamSender,
};
pub use templates::{TemplateEngine, TEAM_PROMPT, TEAM_PROMPT_TEMPLATE};
pub use types::*;
pub use utils::{init_logging, init_logging_with, scrub_message, subscribe_logs, LogEvent};
