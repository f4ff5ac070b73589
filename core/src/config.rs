//! TOML Configuration File Support
//!
//! Configuration for the quote client, loaded from
//! `$XDG_CONFIG_HOME/golden-thought/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://api.quotable.io"
//! request_timeout_secs = 10
//!
//! [cache]
//! dir = "/home/me/.cache/golden-thought"
//! tag_ttl_secs = 86400
//!
//! [logging]
//! file = "/tmp/golden-thought.log"
//! ```
//!
//! Loading runs before the async runtime starts, so file reads here are
//! plain blocking calls.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::backend::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::tag_cache::DEFAULT_TAG_CACHE_TTL;

/// Application directory name under the XDG config and cache roots
pub const APP_DIR_NAME: &str = "golden-thought";

/// Environment variable overriding `api.base_url`
pub const ENV_API_URL: &str = "GOLDEN_THOUGHT_API_URL";
/// Environment variable overriding `api.request_timeout_secs`
pub const ENV_TIMEOUT_SECS: &str = "GOLDEN_THOUGHT_TIMEOUT_SECS";
/// Environment variable overriding `cache.dir`
pub const ENV_CACHE_DIR: &str = "GOLDEN_THOUGHT_CACHE_DIR";
/// Environment variable overriding `cache.tag_ttl_secs`
pub const ENV_TAG_TTL_SECS: &str = "GOLDEN_THOUGHT_TAG_TTL_SECS";

/// Log file name inside the cache directory when none is configured
pub const DEFAULT_LOG_FILE_NAME: &str = "golden-thought.log";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Quote service base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds (unset = transport default)
    pub request_timeout_secs: Option<u64>,

    /// User-Agent header
    pub user_agent: Option<String>,
}

/// `[cache]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheToml {
    /// Directory for the tag cache and other client records
    pub dir: Option<PathBuf>,

    /// Tag cache lifetime in seconds
    pub tag_ttl_secs: Option<u64>,
}

/// `[logging]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingToml {
    /// Write logs to this file instead of the cache directory
    pub file: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThoughtToml {
    /// API section
    pub api: ApiToml,

    /// Cache section
    pub cache: CacheToml,

    /// Logging section
    pub logging: LoggingToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Resolved quote service settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL endpoints are joined onto
    pub base_url: Url,
    /// Per-request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
    /// User-Agent header
    pub user_agent: String,
}

/// Resolved storage settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Storage directory
    pub dir: PathBuf,
    /// Tag cache lifetime
    pub tag_ttl: Duration,
}

/// Resolved logging settings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log file override; see [`ThoughtConfig::log_path`]
    pub file: Option<PathBuf>,
}

/// Centralized configuration for the client
///
/// Use [`load_config`] to load with proper priority handling, then
/// [`ConfigOverrides::apply`] for CLI flags.
#[derive(Clone, Debug)]
pub struct ThoughtConfig {
    /// Quote service
    pub api: ApiConfig,

    /// Client-side storage
    pub cache: CacheConfig,

    /// Logging
    pub logging: LoggingConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Where each non-default value came from, keyed `section.field`
    sources: BTreeMap<&'static str, ConfigSource>,
}

impl Default for ThoughtConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: default_base_url(),
                request_timeout: None,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            cache: CacheConfig {
                dir: default_cache_dir(),
                tag_ttl: DEFAULT_TAG_CACHE_TTL,
            },
            logging: LoggingConfig::default(),
            config_file_path: None,
            sources: BTreeMap::new(),
        }
    }
}

impl ThoughtConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Where `key` (e.g. `"api.base_url"`) was resolved from
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.sources
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }

    /// File the log sink writes to
    ///
    /// The terminal belongs to the UI while the app runs, so logs always go
    /// to a file: the configured one, or one in the cache directory.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| self.cache.dir.join(DEFAULT_LOG_FILE_NAME))
    }

    fn set_source(&mut self, key: &'static str, source: ConfigSource) {
        self.sources.insert(key, source);
    }
}

fn default_base_url() -> Url {
    // Constant input; parsing cannot fail
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base URL is valid"))
}

/// Default storage directory: `$XDG_CACHE_HOME/golden-thought`
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// Parse and check a quote service base URL
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] unless `raw` is an absolute
/// `http` or `https` URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::ValidationError(format!("api.base_url {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::ValidationError(format!(
            "api.base_url must be http or https, got {other:?}"
        ))),
    }
}

fn validate_ttl(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.tag_ttl_secs must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/golden-thought/config.toml` or
/// `~/.config/golden-thought/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR_NAME).join("config.toml"))
}

/// Load configuration from the default path and the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or if a value fails validation. A missing config file is not an error.
pub fn load_config() -> Result<ThoughtConfig, ConfigError> {
    load_config_from_path(default_config_path().as_deref())
}

/// Load configuration from a specific path and the process environment
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_from_path(path: Option<&Path>) -> Result<ThoughtConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an injectable environment lookup
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_with_env<F>(path: Option<&Path>, env: F) -> Result<ThoughtConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ThoughtConfig::default();

    if let Some(config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;

            let toml_config: ThoughtToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.to_path_buf());

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut ThoughtConfig, toml: &ThoughtToml) -> Result<(), ConfigError> {
    if let Some(ref raw) = toml.api.base_url {
        config.api.base_url = parse_base_url(raw)?;
        config.set_source("api.base_url", ConfigSource::File);
    }
    if let Some(secs) = toml.api.request_timeout_secs {
        config.api.request_timeout = Some(Duration::from_secs(secs));
        config.set_source("api.request_timeout", ConfigSource::File);
    }
    if let Some(ref agent) = toml.api.user_agent {
        config.api.user_agent.clone_from(agent);
        config.set_source("api.user_agent", ConfigSource::File);
    }

    if let Some(ref dir) = toml.cache.dir {
        config.cache.dir.clone_from(dir);
        config.set_source("cache.dir", ConfigSource::File);
    }
    if let Some(secs) = toml.cache.tag_ttl_secs {
        config.cache.tag_ttl = validate_ttl(secs)?;
        config.set_source("cache.tag_ttl", ConfigSource::File);
    }

    if let Some(ref file) = toml.logging.file {
        config.logging.file = Some(file.clone());
        config.set_source("logging.file", ConfigSource::File);
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut ThoughtConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env(ENV_API_URL) {
        config.api.base_url = parse_base_url(&raw)?;
        config.set_source("api.base_url", ConfigSource::Env);
    }
    if let Some(raw) = env(ENV_TIMEOUT_SECS) {
        match raw.parse::<u64>() {
            Ok(secs) => {
                config.api.request_timeout = Some(Duration::from_secs(secs));
                config.set_source("api.request_timeout", ConfigSource::Env);
            }
            Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {ENV_TIMEOUT_SECS}"),
        }
    }
    if let Some(raw) = env(ENV_CACHE_DIR) {
        config.cache.dir = PathBuf::from(raw);
        config.set_source("cache.dir", ConfigSource::Env);
    }
    if let Some(raw) = env(ENV_TAG_TTL_SECS) {
        match raw.parse::<u64>() {
            Ok(secs) => {
                config.cache.tag_ttl = validate_ttl(secs)?;
                config.set_source("cache.tag_ttl", ConfigSource::Env);
            }
            Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {ENV_TAG_TTL_SECS}"),
        }
    }

    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub api_base_url: Option<String>,

    /// Storage directory override
    pub cache_dir: Option<PathBuf>,

    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set storage directory override
    #[must_use]
    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = Some(dir);
        self
    }

    /// Set log file override
    #[must_use]
    pub fn with_log_file(mut self, file: PathBuf) -> Self {
        self.log_file = Some(file);
        self
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an invalid base URL.
    pub fn apply(&self, config: &mut ThoughtConfig) -> Result<(), ConfigError> {
        if let Some(ref raw) = self.api_base_url {
            config.api.base_url = parse_base_url(raw)?;
            config.set_source("api.base_url", ConfigSource::Cli);
        }
        if let Some(ref dir) = self.cache_dir {
            config.cache.dir.clone_from(dir);
            config.set_source("cache.dir", ConfigSource::Cli);
        }
        if let Some(ref file) = self.log_file {
            config.logging.file = Some(file.clone());
            config.set_source("logging.file", ConfigSource::Cli);
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
