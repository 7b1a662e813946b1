//! Flat-file memory stores
//!
//! Two layouts live side by side in the same data directory:
//!
//! - [`JsonFileMemoryStore`]: one `<user_id>_memories.json` array per user,
//!   with full message transcripts and metadata.
//! - [`McpMemoryStore`]: a single `memories.json` map of user id to short
//!   text memories, used by the MCP-compatible endpoints.
//!
//! Both serialize writers through async locks and replace files atomically.

#![warn(clippy::all)]

mod fs;
mod json_store;
mod lock;
mod mcp_store;
pub mod types;

pub use json_store::{JsonFileMemoryStore, DEFAULT_SEARCH_LIMIT};
pub use mcp_store::{McpMemoryStore, DEFAULT_MCP_SEARCH_LIMIT, MCP_FILE_NAME};
pub use types::{McpMemory, MemoryEntry, NewMemory, DEFAULT_USER_ID};

use teamgate_core::{Result, TeamgateError};

/// Longest accepted user id
pub const MAX_USER_ID_LEN: usize = 128;

/// Reject user ids that could escape the data directory
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(TeamgateError::validation("user_id cannot be empty"));
    }
    if user_id.len() > MAX_USER_ID_LEN {
        return Err(TeamgateError::validation(format!(
            "user_id too long (max {} bytes)",
            MAX_USER_ID_LEN
        )));
    }
    if user_id.contains(['/', '\\', '\0']) || user_id.contains("..") {
        return Err(TeamgateError::validation(format!(
            "Invalid user_id: {}",
            user_id
        )));
    }
    Ok(())
}
