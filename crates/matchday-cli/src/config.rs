//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - `.env` files and environment variables

use crate::error::{Error, Result};
use matchday_core::http::client::{API_URL_ENV, LEGACY_API_URL_ENV, ORIGIN_ENV};
use matchday_core::{FallbackPolicy, HttpClientConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the session file location
pub const SESSION_FILE_ENV: &str = "MATCHDAY_SESSION_FILE";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection settings
    pub api: ApiConfig,

    /// Session storage settings
    pub session: SessionConfig,

    /// Logging settings
    pub logging: LoggingSection,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL
    pub base_url: String,

    /// Origin for site-relative base URLs
    pub origin: Option<String>,

    /// Treat transport errors mentioning 404 as a missing route
    pub match_not_found_message: bool,
}

/// Session storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session file path
    pub file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level used when no verbosity flag or RUST_LOG is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            origin: None,
            match_not_found_message: false,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "YAML".to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "JSON".to_string(),
            })?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations,
    /// then apply `.env` and environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = file {
            Self::from_file(path)?
        } else {
            Self::load()?
        };

        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = non_blank(API_URL_ENV).or_else(|| non_blank(LEGACY_API_URL_ENV)) {
            self.api.base_url = base_url;
        }
        if let Some(origin) = non_blank(ORIGIN_ENV) {
            self.api.origin = Some(origin);
        }
        if let Some(file) = non_blank(SESSION_FILE_ENV) {
            self.session.file = Some(PathBuf::from(file));
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".matchday.yaml"), PathBuf::from(".matchday.json")];

        if let Some(config_dir) = dirs::config_dir() {
            let matchday_dir = config_dir.join("matchday");
            paths.push(matchday_dir.join("config.yaml"));
            paths.push(matchday_dir.join("config.json"));
        }

        paths
    }

    /// Where the session token is kept
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.session.file {
            return Ok(file.clone());
        }

        dirs::data_dir()
            .map(|d| d.join("matchday").join("session"))
            .ok_or_else(|| Error::config("Unable to determine data directory; set session.file"))
    }

    /// Client configuration for the request layer
    pub fn http_config(&self) -> HttpClientConfig {
        let mut http = HttpClientConfig::new(self.api.base_url.clone()).with_fallback_policy(FallbackPolicy {
            match_not_found_message: self.api.match_not_found_message,
        });
        http.origin = self.api.origin.clone();
        http
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("yaml") | Some("yml"))
}
