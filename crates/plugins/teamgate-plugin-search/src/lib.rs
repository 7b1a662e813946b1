//! Web search backends for research prompts
//!
//! Every backend implements [`teamgate_core::WebSearch`] and returns at most
//! `max_results` hits. Failures come back as `TeamgateError::Search` carrying
//! the text that stands in for results in a prompt.

use reqwest::Client;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use teamgate_core::{AppConfig, Result, TeamgateError, WebSearch};

pub mod cache;
pub mod duckduckgo;
pub mod searxng;

pub use cache::CachedSearch;
pub use duckduckgo::{parse_results, DuckDuckGoSearch, DEFAULT_DDG_URL};
pub use searxng::SearxngSearch;

pub(crate) const NO_TITLE: &str = "No Title";
pub(crate) const NO_DESCRIPTION: &str = "No description";

static HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

pub(crate) fn shared_client() -> Arc<Client> {
    HTTP_CLIENT
        .get_or_init(|| {
            let client = Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!("Falling back to default HTTP client: {}", e);
                    Client::new()
                });
            Arc::new(client)
        })
        .clone()
}

/// Which backend answers searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProvider {
    Searxng,
    DuckDuckGo,
}

impl std::str::FromStr for SearchProvider {
    type Err = TeamgateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "searxng" | "searx" => Ok(SearchProvider::Searxng),
            "duckduckgo" | "ddg" => Ok(SearchProvider::DuckDuckGo),
            other => Err(TeamgateError::config(format!(
                "Unknown search provider '{}'. Expected searxng or duckduckgo",
                other
            ))),
        }
    }
}

/// Build the configured backend, cached when a TTL is set
pub fn build_search(config: &AppConfig) -> Result<Arc<dyn WebSearch>> {
    let provider: SearchProvider = config.search_provider.parse()?;
    let backend: Arc<dyn WebSearch> = match provider {
        SearchProvider::Searxng => Arc::new(SearxngSearch::new(
            config.searxng_url.clone(),
            config.search_max_results,
        )),
        SearchProvider::DuckDuckGo => Arc::new(DuckDuckGoSearch::new(config.search_max_results)),
    };
    tracing::info!(
        provider = ?provider,
        cache_ttl_secs = config.search_cache_ttl_secs,
        "web search configured"
    );

    if config.search_cache_ttl_secs == 0 {
        return Ok(backend);
    }
    Ok(Arc::new(CachedSearch::new(
        backend,
        Duration::from_secs(config.search_cache_ttl_secs),
    )))
}
