//! SearxNG JSON API client

use crate::{shared_client, NO_DESCRIPTION, NO_TITLE};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use teamgate_core::{Result, SearchHit, TeamgateError, WebSearch};

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxResult>,
}

#[derive(Debug, Deserialize)]
struct SearxResult {
    title: Option<String>,
    content: Option<String>,
    url: Option<String>,
}

impl From<SearxResult> for SearchHit {
    fn from(r: SearxResult) -> Self {
        SearchHit {
            title: r.title.unwrap_or_else(|| NO_TITLE.to_string()),
            content: r.content.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            url: r.url.unwrap_or_default(),
        }
    }
}

/// Queries `GET {base}/search?q=..&format=json&categories=general`
pub struct SearxngSearch {
    client: Arc<Client>,
    base_url: String,
    max_results: usize,
    timeout: Duration,
}

impl SearxngSearch {
    pub fn new(base_url: impl Into<String>, max_results: usize) -> Self {
        Self {
            client: shared_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl WebSearch for SearxngSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("categories", "general")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("SearxNG connection error: {}", e);
                TeamgateError::search(format!("Search service unavailable: {}", e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!("SearxNG returned status {}", status.as_u16());
            return Err(TeamgateError::search(format!(
                "Search service error: HTTP {}",
                status.as_u16()
            )));
        }

        let body: SearxResponse = resp.json().await.map_err(|e| {
            tracing::error!("Search error: {}", e);
            TeamgateError::search(format!("Search failed: {}", e))
        })?;

        tracing::debug!(hits = body.results.len(), "searxng results");
        Ok(body
            .results
            .into_iter()
            .take(self.max_results)
            .map(SearchHit::from)
            .collect())
    }
}
