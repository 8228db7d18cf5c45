//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the box-office explorer: API credentials,
//! endpoint URLs, HTTP behavior, and logging, loaded from a TOML file with
//! environment-variable overrides.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (applied by the binary, highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! The engine and clients never read configuration themselves; credentials
//! are handed to them at construction by whoever loaded this.

use crate::errors::{BoxOfficeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// KOBIS box-office API settings
    pub api: ApiConfig,
    /// Review-search API settings
    pub review: ReviewConfig,
    /// HTTP client behavior
    pub http: HttpConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// KOBIS open-API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the KOBIS open-API REST service
    pub base_url: String,
    /// Static access key issued by KOBIS
    pub key: String,
}

/// Review-search (Naver-style open API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Search endpoint URL
    pub endpoint: String,
    /// Client ID sent in the request headers
    pub client_id: String,
    /// Client secret sent in the request headers
    pub client_secret: String,
    /// Maximum number of review links to request
    pub max_results: usize,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("boxoffice.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| BoxOfficeError::Config {
                message: format!("Failed to read config file {:?}: {}", path, e),
            })?;
            toml::from_str(&content).map_err(|e| BoxOfficeError::Config {
                message: format!("Failed to parse config file {:?}: {}", path, e),
            })?
        } else {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("BOXOFFICE_API_KEY") {
            self.api.key = key;
        }
        if let Ok(client_id) = std::env::var("BOXOFFICE_REVIEW_CLIENT_ID") {
            self.review.client_id = client_id;
        }
        if let Ok(secret) = std::env::var("BOXOFFICE_REVIEW_CLIENT_SECRET") {
            self.review.client_secret = secret;
        }
        if let Ok(level) = std::env::var("BOXOFFICE_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Validate configuration values. The API key is required; review-search
    /// credentials are only required when that menu entry is used, so they
    /// are checked separately by [`Config::validate_review`].
    pub fn validate(&self) -> Result<()> {
        if self.api.key.is_empty() {
            return Err(BoxOfficeError::Config {
                message: "api.key is empty; set it in boxoffice.toml or BOXOFFICE_API_KEY"
                    .to_string(),
            });
        }
        if self.http.timeout_seconds == 0 {
            return Err(BoxOfficeError::Config {
                message: "http.timeout_seconds must be greater than zero".to_string(),
            });
        }
        if self.review.max_results == 0 {
            return Err(BoxOfficeError::Config {
                message: "review.max_results must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Validate the review-search credentials
    pub fn validate_review(&self) -> Result<()> {
        if self.review.client_id.is_empty() || self.review.client_secret.is_empty() {
            return Err(BoxOfficeError::Config {
                message: "review.client_id / review.client_secret are not set".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://www.kobis.or.kr/kobisopenapi/webservice/rest".to_string(),
                key: String::new(),
            },
            review: ReviewConfig {
                endpoint: "https://openapi.naver.com/v1/search/blog.json".to_string(),
                client_id: String::new(),
                client_secret: String::new(),
                max_results: 10,
            },
            http: HttpConfig {
                timeout_seconds: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::from_file("definitely/not/here.toml").unwrap();
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[api]
base_url = "http://example.invalid/rest"
key = "abc123"

[review]
endpoint = "http://example.invalid/search"
client_id = "id"
client_secret = "secret"
max_results = 5

[http]
timeout_seconds = 3

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.api.key, "abc123");
        assert_eq!(config.http.timeout_seconds, 3);
        config.validate().unwrap();
        config.validate_review().unwrap();
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }
}
