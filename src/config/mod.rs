//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Cosmetic name lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmeticsConfig {
    /// Resolve cosmetic ids to names in reports
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the cosmetics API
    #[serde(default = "default_cosmetics_url")]
    pub base_url: String,

    /// Language of returned names
    #[serde(default = "default_language")]
    pub language: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_cosmetics_url() -> String {
    "https://fortnite-api.com/v2/".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for CosmeticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_cosmetics_url(),
            language: default_language(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Report rendering configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Append OS/architecture/CPU details to rendered reports
    #[serde(default)]
    pub include_platform: bool,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Directory holding the web page
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Largest accepted upload
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Live sessions kept before the oldest is evicted (0 = unbounded)
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    12345
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

fn default_max_upload_bytes() -> usize {
    256 * 1024 * 1024
}

fn default_max_sessions() -> usize {
    64
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            static_dir: default_static_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub cosmetics: CosmeticsConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            report: ReportConfig::default(),
            cosmetics: CosmeticsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "Upload limit must be greater than 0".to_string(),
            ));
        }

        if self.cosmetics.enabled {
            if self.cosmetics.timeout_seconds == 0 {
                return Err(ConfigError::ValidationError(
                    "Cosmetics timeout must be greater than 0".to_string(),
                ));
            }
            if self.cosmetics.language.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Cosmetics language must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
