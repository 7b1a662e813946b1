//! In-memory TTL cache in front of any search backend

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use teamgate_core::{Result, SearchHit, WebSearch};
use tokio::sync::Mutex;

const MAX_ENTRIES: usize = 256;

#[derive(Debug, Clone)]
struct CacheEntry {
    hits: Vec<SearchHit>,
    created_at: Instant,
}

/// Caches successful searches by normalized query. Failures are not cached.
pub struct CachedSearch {
    inner: Arc<dyn WebSearch>,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl CachedSearch {
    pub fn new(inner: Arc<dyn WebSearch>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn key(query: &str) -> String {
        query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries
            .values()
            .filter(|e| e.created_at.elapsed() < self.ttl)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl WebSearch for CachedSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let key = Self::key(query);
        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(&key) {
                if entry.created_at.elapsed() < self.ttl {
                    tracing::debug!(query = %key, "search cache hit");
                    return Ok(entry.hits.clone());
                }
            }
        }

        let hits = self.inner.search(query).await?;

        let mut entries = self.entries.lock().await;
        let ttl = self.ttl;
        entries.retain(|_, e| e.created_at.elapsed() < ttl);
        if entries.len() >= MAX_ENTRIES {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                hits: hits.clone(),
                created_at: Instant::now(),
            },
        );
        Ok(hits)
    }
}
