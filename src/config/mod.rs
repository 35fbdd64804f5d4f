//! Configuration management
//!
//! This module handles loading and parsing configuration for the content core.
//! Configuration can be loaded from:
//! - content-core.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use crate::models::UserRole;
use serde::{Deserialize, Serialize};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "content-core.yml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// User directory configuration
    #[serde(default)]
    pub users: UsersConfig,
    /// Report configuration
    #[serde(default)]
    pub reports: ReportConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "content_core=info".to_string()
}

/// A user registered when the directory is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: UserRole,
}

/// User directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersConfig {
    /// Whether `defaults` are registered at startup
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,
    /// Users registered at startup
    #[serde(default = "default_seed_users")]
    pub defaults: Vec<SeedUser>,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            seed_defaults: default_seed_defaults(),
            defaults: default_seed_users(),
        }
    }
}

fn default_seed_defaults() -> bool {
    true
}

fn default_seed_users() -> Vec<SeedUser> {
    vec![
        SeedUser {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            email: "admin@example.com".to_string(),
            role: UserRole::Administrator,
        },
        SeedUser {
            username: "editor".to_string(),
            password: "editor123".to_string(),
            email: "editor@example.com".to_string(),
            role: UserRole::Editor,
        },
    ]
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of items listed as most recent content
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_recent_limit() -> usize {
    5
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        // Handle empty file - return defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - CONTENT_CORE_LOG_FILTER
    /// - CONTENT_CORE_SEED_USERS
    /// - CONTENT_CORE_RECENT_LIMIT
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(filter) = std::env::var("CONTENT_CORE_LOG_FILTER") {
            self.logging.filter = filter;
        }
        if let Ok(seed) = std::env::var("CONTENT_CORE_SEED_USERS") {
            match seed.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.users.seed_defaults = true,
                "false" | "0" | "no" => self.users.seed_defaults = false,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(limit) = std::env::var("CONTENT_CORE_RECENT_LIMIT") {
            if let Ok(limit) = limit.parse::<usize>() {
                self.reports.recent_limit = limit;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
