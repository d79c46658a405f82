//! Configuration for the Semantic Scholar client.
//!
//! Configuration is layered: bundled defaults ship with the library, user
//! files override them, and environment variables win over everything.
//! Sources in order of precedence (later overrides earlier):
//! 1. Bundled defaults (alexandria.toml shipped with the library)
//! 2. User config in home directory (~/.config/alexandria/alexandria.toml)
//! 3. User config in current directory (./alexandria.toml)
//! 4. Environment variables (ALEXANDRIA_ prefix, __ as section separator)

use alexandria_breaker::CircuitConfig;
use alexandria_cache::CacheConfig;
use alexandria_error::{AlexandriaError, AlexandriaResult, ConfigError};
use alexandria_rate_limit::RetryConfig;
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Which of the two Semantic Scholar APIs a request targets.
///
/// Paper and author lookups live on the Graph API; recommendation
/// endpoints live on a separate host with its own base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ApiBase {
    /// Graph API: papers, authors, citations, search
    Graph,
    /// Recommendations API: related-paper suggestions
    Recommendations,
}

/// HTTP-facing settings: base URLs, timeout, credentials.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct ApiConfig {
    /// Base URL for the Graph API
    #[serde(default = "default_graph_base_url")]
    graph_base_url: String,

    /// Base URL for the Recommendations API
    #[serde(default = "default_recommendations_base_url")]
    recommendations_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Whether rate-limited requests are retried automatically
    #[serde(default = "default_enable_auto_retry")]
    enable_auto_retry: bool,

    /// Semantic Scholar API key, granting the authenticated rate tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

fn default_graph_base_url() -> String {
    "https://api.semanticscholar.org/graph/v1".to_string()
}

fn default_recommendations_base_url() -> String {
    "https://api.semanticscholar.org/recommendations/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_enable_auto_retry() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            graph_base_url: default_graph_base_url(),
            recommendations_base_url: default_recommendations_base_url(),
            timeout_secs: default_timeout_secs(),
            enable_auto_retry: default_enable_auto_retry(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// The base URL for the given API.
    pub fn base_url(&self, base: ApiBase) -> &str {
        match base {
            ApiBase::Graph => &self.graph_base_url,
            ApiBase::Recommendations => &self.recommendations_base_url,
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether a non-empty API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|key| !key.is_empty())
    }
}

/// Top-level Alexandria configuration.
///
/// # Example
///
/// ```no_run
/// use alexandria_client::AlexandriaConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AlexandriaConfig::load()?;
/// println!("graph API: {}", config.api.base_url(alexandria_client::ApiBase::Graph));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlexandriaConfig {
    /// Log level for the tracing subscriber (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// HTTP-facing settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Backoff behavior for rate-limited requests
    #[serde(default)]
    pub retry: RetryConfig,

    /// Circuit breaker thresholds
    #[serde(default)]
    pub circuit: CircuitConfig,

    /// Response cache sizing and TTLs
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AlexandriaConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            circuit: CircuitConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl AlexandriaConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> AlexandriaResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                AlexandriaError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AlexandriaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: env > user override > bundled default.
    ///
    /// User config files are optional and silently skipped if not found.
    /// After merging, a missing API key falls back to the
    /// `SEMANTIC_SCHOLAR_API_KEY` environment variable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use alexandria_client::AlexandriaConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = AlexandriaConfig::load()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> AlexandriaResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../alexandria.toml");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/alexandria/alexandria.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional)
        builder = builder.add_source(File::with_name("alexandria").required(false));

        // Environment variables win: ALEXANDRIA_CACHE__MAX_ENTRIES=500
        builder = builder.add_source(
            Environment::with_prefix("ALEXANDRIA")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: AlexandriaConfig = builder
            .build()
            .map_err(|e| {
                AlexandriaError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AlexandriaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        if config.api.api_key.is_none()
            && let Ok(key) = std::env::var("SEMANTIC_SCHOLAR_API_KEY")
            && !key.is_empty()
        {
            debug!("Using API key from SEMANTIC_SCHOLAR_API_KEY");
            config.api.api_key = Some(key);
        }

        Ok(config)
    }
}
