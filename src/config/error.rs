//! Errors raised while loading `notifiers` settings

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` or `NOTIFIERS_CONFIG_FILE` names a file that does not exist
    #[error("settings file {} does not exist", path.display())]
    MissingFile { path: PathBuf },

    /// The merged sources do not fit the settings structure, e.g. a string
    /// where a number of seconds is expected
    #[error("settings do not match the expected structure: {0}")]
    Shape(String),

    /// A well-typed value that is not allowed
    #[error("invalid setting {field}: {message}")]
    Invalid { field: String, message: String },

    /// TOML syntax errors and other failures while reading the sources
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Dotted settings key the error is about, when one is known
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}
