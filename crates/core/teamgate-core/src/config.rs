//! Environment-driven settings: `.env` loading and [`AppConfig`]

use crate::{Result, TeamgateError};
use std::env;
use std::path::{Path, PathBuf};

/// Load environment variables from .env file
///
/// Safe to call when no .env exists; only a malformed file is an error.
///
/// # Example
///
/// ```no_run
/// use teamgate_core::load_env;
///
/// load_env().ok();
/// let url = std::env::var("OLLAMA_BASE_URL").unwrap_or_default();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(TeamgateError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::warn!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(TeamgateError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load an explicit env file; unlike [`load_env`] a missing file is an error
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    dotenvy::from_path(path).map_err(|e| {
        TeamgateError::config(format!("Failed to load env file {}: {}", path.display(), e))
    })?;
    tracing::info!("Loaded environment from: {}", path.display());
    Ok(())
}

/// String setting, or `default` when unset
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Flag setting; accepts true/false, 1/0, yes/no, on/off
pub fn get_env_bool(key: &str, default: bool) -> bool {
    match env::var(key).map(|v| v.trim().to_ascii_lowercase()) {
        Ok(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => true,
        Ok(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => false,
        _ => default,
    }
}

/// Numeric setting; unparsable values fall back to `default`
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Process-wide settings for the gateway and its collaborators
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host for the HTTP API
    pub host: String,
    /// Bind port for the HTTP API
    pub port: u16,
    /// Base URL of the Ollama-compatible inference daemon
    pub ollama_base_url: String,
    /// Model name passed to the daemon
    pub ollama_model: String,
    /// Request timeout for generation calls
    pub ollama_timeout_secs: u64,
    /// `searxng` or `duckduckgo`
    pub search_provider: String,
    /// SearxNG base URL
    pub searxng_url: String,
    /// Results kept in a formatted search block
    pub search_max_results: usize,
    /// Seconds a search result stays cached; 0 disables the cache
    pub search_cache_ttl_secs: u64,
    /// Directory holding the JSON memory files
    pub memory_data_dir: PathBuf,
    /// SQLite URL for conversation history
    pub chat_db_url: String,
    /// Serve `/logs` as SSE
    pub logs_enabled: bool,
    /// Permissive CORS on the API router
    pub cors_enabled: bool,
    /// Seconds between background status checks; 0 disables them
    pub status_refresh_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.1:8b".to_string(),
            ollama_timeout_secs: 60,
            search_provider: "searxng".to_string(),
            searxng_url: "http://localhost:8080".to_string(),
            search_max_results: 5,
            search_cache_ttl_secs: 300,
            memory_data_dir: PathBuf::from("./data"),
            chat_db_url: "sqlite://data/chat.sqlite".to_string(),
            logs_enabled: false,
            cors_enabled: true,
            status_refresh_secs: 30,
        }
    }
}

impl AppConfig {
    /// Build from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            host: get_env_or("TEAMGATE_HOST", &d.host),
            port: get_env_int("TEAMGATE_PORT", d.port),
            ollama_base_url: get_env_or("OLLAMA_BASE_URL", &d.ollama_base_url),
            ollama_model: get_env_or("OLLAMA_MODEL", &d.ollama_model),
            ollama_timeout_secs: get_env_int("OLLAMA_TIMEOUT_SECS", d.ollama_timeout_secs),
            search_provider: get_env_or("SEARCH_PROVIDER", &d.search_provider).to_lowercase(),
            searxng_url: get_env_or("SEARXNG_URL", &d.searxng_url),
            search_max_results: get_env_int("SEARCH_MAX_RESULTS", d.search_max_results),
            search_cache_ttl_secs: get_env_int("SEARCH_CACHE_TTL", d.search_cache_ttl_secs),
            memory_data_dir: env::var("MEMORY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(d.memory_data_dir),
            chat_db_url: get_env_or("CHAT_DB_URL", &d.chat_db_url),
            logs_enabled: get_env_bool("TEAMGATE_LOGS_ENABLED", d.logs_enabled),
            cors_enabled: get_env_bool("TEAMGATE_CORS_ENABLED", d.cors_enabled),
            status_refresh_secs: get_env_int("TEAMGATE_STATUS_REFRESH_SECS", d.status_refresh_secs),
        }
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_spellings() {
        env::set_var("TG_TEST_LOGS_ON", " Yes ");
        env::set_var("TG_TEST_CORS_OFF", "0");
        env::set_var("TG_TEST_FLAG_JUNK", "maybe");

        assert!(get_env_bool("TG_TEST_LOGS_ON", false));
        assert!(!get_env_bool("TG_TEST_CORS_OFF", true));
        assert!(get_env_bool("TG_TEST_FLAG_JUNK", true));
        assert!(!get_env_bool("TG_NONEXISTENT_BOOL", false));

        env::remove_var("TG_TEST_LOGS_ON");
        env::remove_var("TG_TEST_CORS_OFF");
        env::remove_var("TG_TEST_FLAG_JUNK");
    }

    #[test]
    fn test_get_env_int() {
        env::set_var("TG_TEST_INT", "42");
        assert_eq!(get_env_int("TG_TEST_INT", 0), 42);
        assert_eq!(get_env_int("TG_NONEXISTENT_INT", 99), 99);
        env::remove_var("TG_TEST_INT");
    }

    #[test]
    fn test_get_env_or() {
        env::set_var("TG_TEST_STRING", "hello");
        assert_eq!(get_env_or("TG_TEST_STRING", "default"), "hello");
        assert_eq!(get_env_or("TG_NONEXISTENT_STRING", "default"), "default");
        env::remove_var("TG_TEST_STRING");
    }

    #[test]
    fn test_unparsable_int_falls_back() {
        env::set_var("TG_TEST_BAD_PORT", "eighty");
        assert_eq!(get_env_int::<u16>("TG_TEST_BAD_PORT", 8000), 8000);
        env::remove_var("TG_TEST_BAD_PORT");
    }

    #[test]
    fn test_env_file_loading() {
        let dir = std::env::temp_dir().join(format!("tg-env-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join(".env");
        std::fs::write(&file, "TG_TEST_FROM_FILE=loaded\n").unwrap();

        load_env_from_path(&file).unwrap();
        assert_eq!(get_env_or("TG_TEST_FROM_FILE", "missing"), "loaded");
        assert!(load_env_from_path(dir.join("absent.env")).is_err());

        env::remove_var("TG_TEST_FROM_FILE");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.ollama_model, "llama3.1:8b");
        assert_eq!(cfg.search_max_results, 5);
        assert_eq!(cfg.status_refresh_secs, 30);
    }
}
