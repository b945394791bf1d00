//! Configuration settings structures for notifiers
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::error::ConfigError;
use crate::core::CallOptions;
use crate::logger::{ConsoleOutput, FileOutput, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/notifiers.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_pool_max_idle_per_host() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("notifiers/{}", env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = self.console.enabled.then_some(ConsoleOutput {
            colored: self.console.colored,
        });
        let file = self.file.into_file_output()?;

        LoggerConfig::new(&self.level, console, file)
            .map_err(|e| ConfigError::invalid("logger", e.to_string()))
    }
}

impl FileSettings {
    /// The file output, or `None` when file logging is off
    ///
    /// The format is checked even when the output is off.
    pub fn into_file_output(self) -> Result<Option<FileOutput>, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::invalid("logger.file.format", e.to_string()))?;

        Ok(self.enabled.then(|| FileOutput {
            path: PathBuf::from(self.path),
            append: self.append,
            format,
        }))
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// Settings for the shared HTTP client used by providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HttpSettings {
    /// Total request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 600, message = "Timeout must be between 1 and 600 seconds"))]
    pub timeout_seconds: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    #[validate(range(min = 1, max = 600, message = "Connect timeout must be between 1 and 600 seconds"))]
    pub connect_timeout_seconds: u64,

    /// Idle connections kept per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1, message = "User agent cannot be empty"))]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Notify Settings
// ============================================================================

/// Defaults applied to every CLI send or fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NotifySettings {
    /// Prefix used to read provider arguments from the environment.
    ///
    /// When unset, a reserved `env_prefix` argument may pick one per call,
    /// falling back to `NOTIFIERS`.
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "Environment prefix must be 1-64 characters"))]
    pub env_prefix: Option<String>,

    /// Exit with an error when a notification reports errors
    #[serde(default)]
    pub raise_on_errors: bool,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            env_prefix: None,
            raise_on_errors: false,
        }
    }
}

impl NotifySettings {
    /// Per-call options; the prefix is only forced when one is configured
    pub fn call_options(&self) -> CallOptions {
        match &self.env_prefix {
            Some(prefix) => CallOptions::new().with_env_prefix(prefix.clone()),
            None => CallOptions::new(),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// HTTP client configuration
    #[serde(default)]
    #[validate(nested)]
    pub http: HttpSettings,

    /// Per-call defaults
    #[serde(default)]
    #[validate(nested)]
    pub notify: NotifySettings,
}

impl Settings {
    /// Validate every section
    ///
    /// Runs the derived field rules first, then the checks that need more
    /// than one field or a parser.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Validate::validate(self).map_err(|e| ConfigError::invalid("settings", e.to_string()))?;

        if let Some(declared) = &self.notify.env_prefix {
            let prefix = declared.trim_end_matches('_');
            if prefix.is_empty()
                || !prefix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ConfigError::invalid(
                    "notify.env_prefix",
                    format!(
                        "Invalid environment prefix '{declared}'. Use letters, digits and underscores."
                    ),
                ));
            }
        }

        self.logger.clone().into_logger_config()?;
        Ok(())
    }
}
