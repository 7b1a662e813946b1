//! Single-file memory store for Model Context Protocol clients
//!
//! All users share `<data_dir>/memories.json`, a map from user id to a list
//! of [`McpMemory`]. One lock guards the whole file.

use crate::fs::{read_json_or_default, write_json_atomic};
use crate::types::McpMemory;
use crate::validate_user_id;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use teamgate_core::Result;
use tokio::sync::Mutex;

/// Default search page size
pub const DEFAULT_MCP_SEARCH_LIMIT: usize = 5;

/// File name of the shared store
pub const MCP_FILE_NAME: &str = "memories.json";

type McpFile = BTreeMap<String, Vec<McpMemory>>;

pub struct McpMemoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl McpMemoryStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(MCP_FILE_NAME),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a memory for `user_id`
    pub async fn add(&self, user_id: &str, content: &str) -> Result<McpMemory> {
        validate_user_id(user_id)?;
        let _guard = self.lock.lock().await;

        let mut data: McpFile = read_json_or_default(&self.path).await?;
        let list = data.entry(user_id.to_string()).or_default();
        let memory = McpMemory {
            content: content.to_string(),
            timestamp: (list.len() + 1).to_string(),
        };
        list.push(memory.clone());
        write_json_atomic(&self.path, &data).await?;
        Ok(memory)
    }

    /// Case-insensitive substring search over one user's memories
    pub async fn search(&self, user_id: &str, query: &str, limit: usize) -> Result<Vec<McpMemory>> {
        let needle = query.to_lowercase();
        Ok(self
            .list(user_id)
            .await?
            .into_iter()
            .filter(|m| m.content.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }

    /// All memories of a user
    pub async fn list(&self, user_id: &str) -> Result<Vec<McpMemory>> {
        validate_user_id(user_id)?;
        let _guard = self.lock.lock().await;
        let mut data: McpFile = read_json_or_default(&self.path).await?;
        Ok(data.remove(user_id).unwrap_or_default())
    }

    /// Remove a user's memories; `false` when the user had none
    pub async fn delete(&self, user_id: &str) -> Result<bool> {
        validate_user_id(user_id)?;
        let _guard = self.lock.lock().await;
        let mut data: McpFile = read_json_or_default(&self.path).await?;
        if data.remove(user_id).is_none() {
            return Ok(false);
        }
        write_json_atomic(&self.path, &data).await?;
        Ok(true)
    }
}
