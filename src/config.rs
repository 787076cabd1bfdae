//! Configuration module for listgate.

use serde::Deserialize;
use std::path::Path;

use crate::lists::ListSettings;
use crate::validation::validate_list_name;
use crate::{ListGateError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// List engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Engine backend (sqlite, memory).
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Reserved site list, hidden from enumeration.
    #[serde(default = "default_site_list")]
    pub site_list: String,
    /// Domain of list posting addresses.
    #[serde(default = "default_email_host")]
    pub email_host: String,
    /// Whether new lists may be created with the open subscribe policy.
    #[serde(default)]
    pub allow_open_subscribe: bool,
    /// Subscribe policy for new lists (0-3).
    #[serde(default = "default_subscribe_policy")]
    pub default_subscribe_policy: i64,
    /// Archive visibility for new lists (0 public, 1 private).
    #[serde(default)]
    pub default_archive_private: i64,
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_database_path() -> String {
    "data/listgate.db".to_string()
}

fn default_site_list() -> String {
    "mailman".to_string()
}

fn default_email_host() -> String {
    "lists.example.com".to_string()
}

fn default_subscribe_policy() -> i64 {
    1 // confirm
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_path: default_database_path(),
            site_list: default_site_list(),
            email_host: default_email_host(),
            allow_open_subscribe: false,
            default_subscribe_policy: default_subscribe_policy(),
            default_archive_private: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/listgate.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ListGateError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ListGateError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables (empty values are ignored):
    /// - `LISTGATE_DATABASE_PATH`
    /// - `LISTGATE_SITE_LIST`
    /// - `LISTGATE_EMAIL_HOST`
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 3] = [
            ("LISTGATE_DATABASE_PATH", &mut self.engine.database_path),
            ("LISTGATE_SITE_LIST", &mut self.engine.site_list),
            ("LISTGATE_EMAIL_HOST", &mut self.engine.email_host),
        ];
        for (var, target) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the engine backend is unknown
    /// - the site list name is not a valid list name
    /// - a default list parameter is out of range
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.engine.backend.as_str(), "sqlite" | "memory") {
            return Err(ListGateError::Config(format!(
                "unknown engine backend '{}' (expected sqlite or memory)",
                self.engine.backend
            )));
        }

        if validate_list_name(&self.engine.site_list).is_err() {
            return Err(ListGateError::Config(format!(
                "site_list '{}' is not a valid list name",
                self.engine.site_list
            )));
        }

        ListSettings::from_config(&self.engine)?;
        Ok(())
    }
}
