//! Per-user JSON file memory store
//!
//! Each user has `<data_dir>/<user_id>_memories.json`, a pretty-printed
//! array of [`MemoryEntry`]. Read-modify-write cycles for one user are
//! serialized by a per-user lock.

use crate::fs::{read_json_or_default, remove_if_exists, write_json_atomic};
use crate::lock::UserLocks;
use crate::types::{MemoryEntry, NewMemory};
use crate::validate_user_id;
use std::path::{Path, PathBuf};
use teamgate_core::Result;

/// Default search page size
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

pub struct JsonFileMemoryStore {
    data_dir: PathBuf,
    locks: UserLocks,
}

impl JsonFileMemoryStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: UserLocks::default(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a user's memory file
    pub fn user_file(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.data_dir.join(format!("{}_memories.json", user_id)))
    }

    /// Append a memory built from `req` and return it
    pub async fn create(&self, req: NewMemory) -> Result<MemoryEntry> {
        let path = self.user_file(&req.user_id)?;
        let _guard = self.locks.lock(&req.user_id).await;

        let mut memories: Vec<MemoryEntry> = read_json_or_default(&path).await?;
        let entry = MemoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            content: req.content(),
            messages: req.messages,
            user_id: req.user_id,
            agent_id: req.agent_id,
            metadata: req.metadata,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        memories.push(entry.clone());
        write_json_atomic(&path, &memories).await?;

        tracing::debug!(user_id = %entry.user_id, total = memories.len(), "memory stored");
        Ok(entry)
    }

    /// All memories of a user, oldest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<MemoryEntry>> {
        let path = self.user_file(user_id)?;
        let _guard = self.locks.lock(user_id).await;
        read_json_or_default(&path).await
    }

    /// Memories whose content contains `query`, case-insensitively
    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>> {
        let needle = query.to_lowercase();
        Ok(self
            .list(user_id)
            .await?
            .into_iter()
            .filter(|m| m.content.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }

    /// Drop a user's file; `false` when there was none
    pub async fn delete(&self, user_id: &str) -> Result<bool> {
        let path = self.user_file(user_id)?;
        let _guard = self.locks.lock(user_id).await;
        let removed = remove_if_exists(&path).await?;
        tracing::info!(user_id = %user_id, removed, "memories deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamgate_core::Message;

    #[tokio::test]
    async fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMemoryStore::new(dir.path());

        store
            .create(NewMemory::new("alice", vec![Message::user("hello")]))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("alice_memories.json")).unwrap();
        assert!(raw.starts_with("[\n  {"));
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0]["content"], "hello");
        assert_eq!(parsed[0]["messages"][0]["role"], "user");
        assert!(parsed[0]["agent_id"].is_null());
    }

    #[tokio::test]
    async fn test_bad_user_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMemoryStore::new(dir.path());
        assert!(store.list("../etc").await.is_err());
        assert!(store.delete("").await.is_err());
    }
}
