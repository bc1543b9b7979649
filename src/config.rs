//! Configuration types for newsdesk

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration for the newsdesk gateway
///
/// Every field has a default, so an empty JSON object is a valid
/// configuration file. Build it once at startup and hand it to
/// [`Gateway::from_config`](crate::Gateway::from_config).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Content worker settings
    #[serde(default)]
    pub worker: WorkerConfig,

    /// API and server settings
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

/// Search provider configuration (NewsAPI-compatible `/v2/everything`)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Provider base URL (default: "https://newsapi.org")
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// API key sent in the `X-Api-Key` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// Language filter applied to every search (default: "en")
    #[serde(default = "default_search_language")]
    pub language: String,

    /// Provider sort order (default: "relevancy")
    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    /// Number of results requested per search (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Round-trip timeout for a provider request (default: 15 seconds)
    #[serde(default = "default_search_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            api_key: None,
            language: default_search_language(),
            sort_by: default_sort_by(),
            page_size: default_page_size(),
            timeout: default_search_timeout(),
        }
    }
}

/// Content worker configuration
///
/// The worker is a one-shot external program: it reads `{"url": ...}` from
/// stdin, writes one JSON document to stdout and exits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Program to execute (default: `python3` found on PATH)
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Arguments passed to the program (default: ["nlp_service.py"])
    #[serde(default = "default_worker_args")]
    pub args: Vec<String>,

    /// Working directory for the worker process (default: inherited)
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Deadline for one invocation; the process is killed on expiry (default: 120 seconds)
    #[serde(default = "default_worker_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// Maximum invocations in flight; excess requests are rejected (default: 4)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Search PATH for the interpreter when `program` is not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: default_worker_args(),
            working_dir: None,
            timeout: default_worker_timeout(),
            max_concurrent: default_max_concurrent(),
            search_path: true,
        }
    }
}

/// API and external server integration configuration
///
/// Groups settings for external access and control interfaces.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// The result is validated before it is returned.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.search.page_size) {
            return Err(config_error(
                "search.page_size",
                format!("must be between 1 and 100, got {}", self.search.page_size),
            ));
        }
        if self.search.language.trim().is_empty() {
            return Err(config_error("search.language", "must not be empty"));
        }
        if self.search.timeout.is_zero() {
            return Err(config_error("search.timeout", "must be greater than zero"));
        }
        match url::Url::parse(&self.search.base_url) {
            Ok(base) if matches!(base.scheme(), "http" | "https") => {}
            Ok(base) => {
                return Err(config_error(
                    "search.base_url",
                    format!("unsupported scheme '{}'", base.scheme()),
                ));
            }
            Err(e) => {
                return Err(config_error(
                    "search.base_url",
                    format!("invalid URL '{}': {}", self.search.base_url, e),
                ));
            }
        }
        if self.worker.max_concurrent == 0 {
            return Err(config_error("worker.max_concurrent", "must be at least 1"));
        }
        if self.worker.timeout.is_zero() {
            return Err(config_error("worker.timeout", "must be greater than zero"));
        }
        Ok(())
    }
}

fn config_error(key: &str, message: impl Into<String>) -> Error {
    let message = message.into();
    Error::Config {
        message: format!("{key}: {message}"),
        key: Some(key.to_string()),
    }
}

fn default_search_base_url() -> String {
    "https://newsapi.org".to_string()
}

fn default_search_language() -> String {
    "en".to_string()
}

fn default_sort_by() -> String {
    "relevancy".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_search_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_worker_args() -> Vec<String> {
    vec!["nlp_service.py".to_string()]
}

fn default_worker_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_max_concurrent() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
