//! Configuration management for Claimdesk
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ClaimdeskError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/claimdesk.yaml";

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Main configuration structure for Claimdesk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Decision service connection settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Terminal rendering settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decision service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the decision service, without the `/api` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("claimdesk/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Terminal rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Emit ANSI colors
    #[serde(default = "default_color")]
    pub color: bool,

    /// Maximum referenced clauses shown in the detail view
    #[serde(default = "default_max_clauses")]
    pub max_clauses: usize,

    /// Width of the query preview column in the history table
    #[serde(default = "default_preview_width")]
    pub preview_width: usize,
}

fn default_color() -> bool {
    true
}

fn default_max_clauses() -> usize {
    10
}

fn default_preview_width() -> usize {
    60
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            max_clauses: default_max_clauses(),
            preview_width: default_preview_width(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClaimdeskError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ClaimdeskError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("CLAIMDESK_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: CLAIMDESK_BASE_URL");
            self.backend.base_url = base_url;
        }

        if let Ok(color) = std::env::var("CLAIMDESK_COLOR") {
            match color.parse::<bool>() {
                Ok(v) => self.display.color = v,
                Err(_) => tracing::warn!("Invalid value for CLAIMDESK_COLOR: {}", color),
            }
        }

        if let Ok(json_logs) = std::env::var("CLAIMDESK_JSON_LOGS") {
            match json_logs.parse::<bool>() {
                Ok(v) => self.logging.json = v,
                Err(_) => tracing::warn!("Invalid value for CLAIMDESK_JSON_LOGS: {}", json_logs),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.backend.base_url = base_url.clone();
        }
        if cli.no_color {
            self.display.color = false;
        }
    }

    /// Validate the configuration
    ///
    /// Normalizes the base URL (trailing slashes removed) and checks that it
    /// is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&mut self) -> Result<()> {
        let trimmed = self.backend.base_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(ClaimdeskError::Config("backend.base_url cannot be empty".to_string()).into());
        }

        let parsed = url::Url::parse(&trimmed).map_err(|e| {
            ClaimdeskError::Config(format!("Invalid backend.base_url '{}': {}", trimmed, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClaimdeskError::Config(format!(
                "backend.base_url must use http or https, got: {}",
                parsed.scheme()
            ))
            .into());
        }

        if self.display.preview_width < 8 {
            return Err(ClaimdeskError::Config(
                "display.preview_width must be at least 8".to_string(),
            )
            .into());
        }

        self.backend.base_url = trimmed;
        Ok(())
    }
}
