//! DuckDuckGo HTML results scraper

use crate::{shared_client, NO_DESCRIPTION};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use teamgate_core::{strip_html_tags, Result, SearchHit, TeamgateError, WebSearch};

/// Public HTML endpoint
pub const DEFAULT_DDG_URL: &str = "https://html.duckduckgo.com";

static RESULT_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]+class="result__a"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("result link pattern")
});
static RESULT_LINK_HREF_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]+href="([^"]*)"[^>]*class="result__a"[^>]*>(.*?)</a>"#)
        .expect("result link pattern")
});
static SNIPPET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<[a-z]+[^>]+class="result__snippet"[^>]*>(.*?)</(?:a|div|td|span)>"#)
        .expect("snippet pattern")
});

/// Queries `GET {base}/html/?q=..` and scrapes titles, snippets and links
pub struct DuckDuckGoSearch {
    client: Arc<Client>,
    base_url: String,
    max_results: usize,
    timeout: Duration,
}

impl DuckDuckGoSearch {
    pub fn new(max_results: usize) -> Self {
        Self::with_base_url(DEFAULT_DDG_URL, max_results)
    }

    pub fn with_base_url(base_url: impl Into<String>, max_results: usize) -> Self {
        Self {
            client: shared_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
            timeout: Duration::from_secs(10),
        }
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
}

fn clean_fragment(html: &str) -> String {
    decode_entities(strip_html_tags(html).trim())
}

/// Result links go through a `/l/?uddg=<target>` redirect; unwrap it
fn resolve_link(href: &str) -> String {
    let href = decode_entities(href);
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.clone()
    };
    Url::parse(&absolute)
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "uddg")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or(href)
}

/// Pull hits out of a results page
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let mut links: Vec<(String, String)> = RESULT_LINK_RE
        .captures_iter(html)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect();
    if links.is_empty() {
        links = RESULT_LINK_HREF_FIRST_RE
            .captures_iter(html)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();
    }
    let snippets: Vec<String> = SNIPPET_RE
        .captures_iter(html)
        .map(|c| clean_fragment(&c[1]))
        .collect();

    links
        .into_iter()
        .enumerate()
        .take(limit)
        .map(|(i, (href, title))| SearchHit {
            title: clean_fragment(&title),
            content: snippets
                .get(i)
                .filter(|s| !s.is_empty())
                .cloned()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            url: resolve_link(&href),
        })
        .collect()
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/html/", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0 (teamgate)")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TeamgateError::search(format!("Search unavailable: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TeamgateError::search(format!(
                "Search service error: HTTP {}",
                status.as_u16()
            )));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| TeamgateError::search(format!("Search failed: {}", e)))?;
        Ok(parse_results(&html, self.max_results))
    }
}
