//! Health of the gateway's collaborators
//!
//! A [`StatusMonitor`] polls every configured service concurrently and rolls
//! the results up: healthy when nothing is down, degraded while fewer than
//! half of the services are down, unhealthy otherwise. A background task
//! keeps the last report for `/status/cached`.

use futures_util::future::join_all;
use reqwest::{redirect, Client};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use teamgate_core::AppConfig;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Per-service request timeout
pub const CHECK_TIMEOUT_SECS: u64 = 5;
/// Reported for a service checked without an HTTP endpoint
pub const NO_ENDPOINT_NOTE: &str = "No HTTP endpoint - assumed healthy";

/// A service to watch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTarget {
    pub name: String,
    pub category: String,
    pub description: String,
    /// Polled with GET; `None` marks an in-process dependency
    pub health_url: Option<String>,
}

impl ServiceTarget {
    pub fn http(name: &str, category: &str, description: &str, url: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            health_url: Some(url.into()),
        }
    }

    pub fn local(name: &str, category: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            health_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Degraded,
    Unhealthy,
}

impl Health {
    /// Overall health from per-service counts
    pub fn rollup(unhealthy: usize, total: usize) -> Self {
        if unhealthy == 0 {
            Health::Healthy
        } else if unhealthy * 2 < total {
            Health::Degraded
        } else {
            Health::Unhealthy
        }
    }
}

/// Result of one check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    #[serde(flatten)]
    pub target: ServiceTarget,
    pub status: Health,
    pub status_code: Option<u16>,
    pub response_time_ms: u64,
    pub error: Option<String>,
    pub last_checked: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusOverview {
    pub status: Health,
    pub healthy: usize,
    pub unhealthy: usize,
    pub total: usize,
    pub check_duration_ms: u64,
    pub last_updated: String,
}

/// A full report
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub overall: StatusOverview,
    pub services: Vec<ServiceStatus>,
    /// Service names per category
    pub categories: BTreeMap<String, Vec<String>>,
}

impl SystemStatus {
    fn from_services(services: Vec<ServiceStatus>, elapsed: Duration) -> Self {
        let healthy = services
            .iter()
            .filter(|s| s.status == Health::Healthy)
            .count();
        let unhealthy = services.len() - healthy;

        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for s in &services {
            categories
                .entry(s.target.category.clone())
                .or_default()
                .push(s.target.name.clone());
        }

        Self {
            overall: StatusOverview {
                status: Health::rollup(unhealthy, services.len()),
                healthy,
                unhealthy,
                total: services.len(),
                check_duration_ms: elapsed.as_millis() as u64,
                last_updated: chrono::Utc::now().to_rfc3339(),
            },
            services,
            categories,
        }
    }
}

/// Polls collaborators and caches the latest report
pub struct StatusMonitor {
    client: Client,
    targets: Vec<ServiceTarget>,
    cached: RwLock<Option<SystemStatus>>,
}

impl StatusMonitor {
    pub fn new(targets: Vec<ServiceTarget>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(CHECK_TIMEOUT_SECS))
            .redirect(redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            client,
            targets,
            cached: RwLock::new(None),
        }
    }

    /// The inference daemon, plus SearxNG when it answers searches
    pub fn from_config(config: &AppConfig) -> Self {
        let mut targets = vec![ServiceTarget::http(
            "Ollama",
            "AI Services",
            "Local model inference",
            format!("{}/api/tags", config.ollama_base_url.trim_end_matches('/')),
        )];
        if config.search_provider == "searxng" {
            targets.push(ServiceTarget::http(
                "SearxNG",
                "Search",
                "Metasearch for research teams",
                config.searxng_url.clone(),
            ));
        }
        Self::new(targets)
    }

    pub fn with_service(mut self, target: ServiceTarget) -> Self {
        self.targets.push(target);
        self
    }

    pub fn targets(&self) -> &[ServiceTarget] {
        &self.targets
    }

    async fn check(&self, target: &ServiceTarget) -> ServiceStatus {
        let mut status = ServiceStatus {
            target: target.clone(),
            status: Health::Healthy,
            status_code: None,
            response_time_ms: 0,
            error: None,
            last_checked: String::new(),
        };

        match &target.health_url {
            None => status.error = Some(NO_ENDPOINT_NOTE.to_string()),
            Some(url) => {
                let started = Instant::now();
                match self.client.get(url).send().await {
                    // anything short of a server error means it is up
                    Ok(resp) if !resp.status().is_server_error() => {
                        status.status_code = Some(resp.status().as_u16());
                        status.response_time_ms = started.elapsed().as_millis() as u64;
                    }
                    Ok(resp) => {
                        status.status = Health::Unhealthy;
                        status.status_code = Some(resp.status().as_u16());
                        status.error = Some(format!("HTTP {}", resp.status()));
                    }
                    Err(e) => {
                        status.status = Health::Unhealthy;
                        status.error = Some(e.to_string());
                    }
                }
            }
        }
        status.last_checked = chrono::Utc::now().to_rfc3339();
        status
    }

    /// Check every service now
    pub async fn check_all(&self) -> SystemStatus {
        let started = Instant::now();
        let services = join_all(self.targets.iter().map(|t| self.check(t))).await;
        SystemStatus::from_services(services, started.elapsed())
    }

    /// Check every service and keep the report
    pub async fn refresh(&self) -> SystemStatus {
        let report = self.check_all().await;
        *self.cached.write().await = Some(report.clone());
        report
    }

    /// The last report, if any check has finished
    pub async fn cached(&self) -> Option<SystemStatus> {
        self.cached.read().await.clone()
    }

    /// Refresh now and then every `every`
    pub fn spawn_refresh(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let report = self.refresh().await;
                info!(
                    healthy = report.overall.healthy,
                    total = report.overall.total,
                    "status updated"
                );
            }
        })
    }
}
