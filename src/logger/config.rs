//! Runtime logger configuration.
//!
//! Built from [`crate::config::LoggerSettings`]. An output that is switched
//! off is simply absent, so the layers installed by [`super::init_logger`]
//! follow the `Option`s one to one.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;

use super::error::LoggerError;

/// Level and outputs of the `notifiers` logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: Level,
    /// Human-readable output on stderr; stdout carries command output
    pub console: Option<ConsoleOutput>,
    pub file: Option<FileOutput>,
}

impl LoggerConfig {
    /// Parses `level` and checks that at least one output is enabled
    pub fn new(
        level: &str,
        console: Option<ConsoleOutput>,
        file: Option<FileOutput>,
    ) -> Result<Self, LoggerError> {
        let config = Self {
            level: parse_level(level)?,
            console,
            file,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.console.is_none() && self.file.is_none() {
            return Err(LoggerError::config(
                "at least one output (console or file) must be enabled",
            ));
        }
        match &self.file {
            Some(file) => file.validate(),
            None => Ok(()),
        }
    }

    /// Filter directive used when `RUST_LOG` is unset, e.g. `warn`
    pub fn directive(&self) -> String {
        self.level.as_str().to_ascii_lowercase()
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            console: Some(ConsoleOutput { colored: true }),
            file: None,
        }
    }
}

/// Parses one of `trace`, `debug`, `info`, `warn`, `error`, in any case
pub fn parse_level(level: &str) -> Result<Level, LoggerError> {
    level.to_ascii_lowercase().parse::<Level>().map_err(|_| {
        LoggerError::config(format!(
            "invalid log level '{level}', expected trace, debug, info, warn or error"
        ))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleOutput {
    /// Colors are still dropped when stderr is not a terminal
    pub colored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutput {
    pub path: PathBuf,
    /// Keep earlier runs; `false` truncates on start
    pub append: bool,
    pub format: LogFormat,
}

impl FileOutput {
    /// The parent directory is created when the file is opened, not here
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.path.as_os_str().is_empty() {
            return Err(LoggerError::config("log file path cannot be empty"));
        }
        Ok(())
    }
}

/// Line format of the log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::config(format!(
                "invalid log format '{s}', expected full, compact or json"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        })
    }
}
