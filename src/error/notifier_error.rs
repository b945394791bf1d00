use crate::config::error::ConfigError;
use crate::core::{Data, RawResponse};
use crate::logger::LoggerError;
use thiserror::Error;

/// Crate-wide error type.
///
/// `Schema`, `BadArguments` and `Dependency` are local contract violations and
/// are always raised before a provider touches the network. `Notification`
/// only exists on demand through [`crate::core::Response::raise_on_errors`],
/// wrapping remote failures already captured in a response.
#[derive(Error, Debug)]
pub enum NotifierError {
    /// The provider's own declared schema is invalid (a provider defect)
    #[error("Schema error: {message}")]
    Schema { provider: String, message: String },

    /// Caller or environment supplied data failed structural validation
    #[error("Error with sent data: {message}")]
    BadArguments {
        provider: String,
        message: String,
        data: Data,
    },

    /// Cross-field violation the structural schema cannot express
    #[error("{message}")]
    Dependency { provider: String, message: String },

    /// Remote or transport failures captured in a response
    #[error("Notification errors: {}", errors.join(","))]
    Notification {
        provider: String,
        data: Data,
        errors: Vec<String>,
        raw_response: Option<RawResponse>,
    },

    /// A provider resource could not be fetched
    #[error("Notifier resource errors: {}", errors.join(","))]
    Resource {
        provider: String,
        resource: String,
        errors: Vec<String>,
    },

    #[error("Provider '{name}' is already registered")]
    DuplicateProvider { name: String },

    #[error("Provider registry is already initialized")]
    RegistryAlreadyInitialized,

    #[error("Unknown provider: {name}")]
    ProviderNotFound { name: String },

    #[error("Provider '{provider}' has no resource named '{resource}'")]
    ResourceNotFound { provider: String, resource: String },

    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl NotifierError {
    /// Name of the provider the error originated from, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            NotifierError::Schema { provider, .. }
            | NotifierError::BadArguments { provider, .. }
            | NotifierError::Dependency { provider, .. }
            | NotifierError::Notification { provider, .. }
            | NotifierError::Resource { provider, .. }
            | NotifierError::ResourceNotFound { provider, .. } => Some(provider),
            NotifierError::ProviderNotFound { name } | NotifierError::DuplicateProvider { name } => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Human readable message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            NotifierError::Schema { message, .. }
            | NotifierError::BadArguments { message, .. }
            | NotifierError::Dependency { message, .. } => message.clone(),
            NotifierError::Notification { errors, .. } | NotifierError::Resource { errors, .. } => {
                errors.join(",")
            }
            other => other.to_string(),
        }
    }

    pub fn dependency(provider: impl Into<String>, message: impl Into<String>) -> Self {
        NotifierError::Dependency {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn resource(
        provider: impl Into<String>,
        resource: impl Into<String>,
        errors: Vec<String>,
    ) -> Self {
        NotifierError::Resource {
            provider: provider.into(),
            resource: resource.into(),
            errors,
        }
    }
}

impl From<anyhow::Error> for NotifierError {
    fn from(error: anyhow::Error) -> Self {
        NotifierError::Internal { source: error }
    }
}

impl From<ConfigError> for NotifierError {
    fn from(error: ConfigError) -> Self {
        let key = error.field().unwrap_or("settings").to_string();
        NotifierError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

impl From<LoggerError> for NotifierError {
    fn from(error: LoggerError) -> Self {
        NotifierError::Configuration {
            key: "logger".to_string(),
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with NotifierError to simplify function signatures
pub type NotifierResult<T> = Result<T, NotifierError>;
