//! Notification provider contract.
//!
//! A [`Provider`] declares its schema and implements the send action. Callers
//! interact with a [`Notifier`], which binds a provider to a processing
//! [`Pipeline`] and exposes the full calling convention.

use super::environment::{EnvSource, ProcessEnv};
use super::provider_resource::{Fetcher, ProviderResource};
use super::resource::{CallOptions, Pipeline, SchemaResource};
use super::response::Response;
use super::schema::Schema;
use super::Data;
use crate::error::{NotifierError, NotifierResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Descriptive information about a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    pub base_url: String,
    pub site_url: String,
    pub name: String,
}

/// Trait for notification providers (chat, email, SMS, push, ...)
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All providers must be Send + Sync for use in async contexts.
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// struct Dummy;
///
/// impl SchemaResource for Dummy {
///     fn name(&self) -> &str { "dummy" }
///     fn required(&self) -> &[&str] { &["message"] }
///     fn schema_fragment(&self) -> Value {
///         json!({"properties": {"message": {"type": "string"}}})
///     }
/// }
///
/// #[async_trait]
/// impl Provider for Dummy {
///     fn base_url(&self) -> &str { "https://api.dummy.test" }
///     fn site_url(&self) -> &str { "https://dummy.test" }
///
///     async fn send_notification(&self, data: Data) -> Response {
///         self.create_response(data, None, vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: SchemaResource {
    /// API endpoint the provider talks to
    fn base_url(&self) -> &str;

    /// Human-facing site of the service
    fn site_url(&self) -> &str;

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            base_url: self.base_url().to_string(),
            site_url: self.site_url().to_string(),
            name: self.name().to_string(),
        }
    }

    /// Names of the auxiliary resources this provider exposes
    fn resources(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Constructs the resource registered under `name`
    fn resource(&self, _name: &str) -> Option<Box<dyn ProviderResource>> {
        None
    }

    /// Performs the remote send with processed data.
    ///
    /// Transport and remote API failures must be reported as errors inside
    /// the returned [`Response`], never as a panic.
    async fn send_notification(&self, data: Data) -> Response;
}

/// A provider bound to its processing pipeline
///
/// Cloning is cheap and clones share the cached schema.
#[derive(Clone)]
pub struct Notifier {
    provider: Arc<dyn Provider>,
    pipeline: Arc<Pipeline>,
    env: Arc<dyn EnvSource>,
}

impl Notifier {
    /// Binds a provider to the process environment
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self::with_env(provider, Arc::new(ProcessEnv))
    }

    /// Binds a provider to a custom environment source
    pub fn with_env(provider: Box<dyn Provider>, env: Arc<dyn EnvSource>) -> Self {
        Self {
            provider: Arc::from(provider),
            pipeline: Arc::new(Pipeline::new(env.clone())),
            env,
        }
    }

    pub fn name(&self) -> &str {
        self.provider.name()
    }

    pub fn metadata(&self) -> ProviderMetadata {
        self.provider.metadata()
    }

    pub fn resources(&self) -> Vec<&str> {
        self.provider.resources()
    }

    /// Bound handle for one of the provider's resources
    ///
    /// # Errors
    /// [`NotifierError::ResourceNotFound`] when the provider has no such resource.
    pub fn resource(&self, name: &str) -> NotifierResult<Fetcher> {
        self.provider
            .resource(name)
            .map(|resource| Fetcher::with_env(resource, self.env.clone()))
            .ok_or_else(|| NotifierError::ResourceNotFound {
                provider: self.name().to_string(),
                resource: name.to_string(),
            })
    }

    /// Merged schema, computed once per notifier
    pub fn schema(&self) -> NotifierResult<&Schema> {
        self.pipeline.schema(self.provider.as_ref())
    }

    /// Declared argument rules as JSON, in declaration order
    pub fn arguments(&self) -> NotifierResult<Map<String, Value>> {
        Ok(self.schema()?.arguments_json())
    }

    pub fn required(&self) -> Vec<String> {
        self.provider.required().iter().map(|s| s.to_string()).collect()
    }

    pub fn defaults(&self) -> Data {
        self.provider.defaults()
    }

    /// Runs the processing pipeline without sending
    pub fn process(&self, data: Data, options: &CallOptions) -> NotifierResult<Data> {
        self.pipeline.process(self.provider.as_ref(), data, options)
    }

    /// Validates `data` and sends the notification
    ///
    /// # Errors
    /// Only local contract violations, all raised before any remote call:
    /// [`NotifierError::Schema`], [`NotifierError::BadArguments`] and the
    /// provider's dependency check. Remote failures are reported inside the
    /// returned [`Response`].
    pub async fn notify(&self, data: Data) -> NotifierResult<Response> {
        self.notify_with(data, &CallOptions::default()).await
    }

    /// Same as [`Notifier::notify`] with explicit call options
    pub async fn notify_with(&self, data: Data, options: &CallOptions) -> NotifierResult<Response> {
        let data = self.process(data, options)?;
        tracing::info!(provider = self.name(), "sending notification");
        let response = self.provider.send_notification(data).await;
        if response.is_success() {
            tracing::debug!(provider = self.name(), "notification sent");
        } else {
            tracing::warn!(
                provider = self.name(),
                errors = ?response.errors(),
                "notification failed"
            );
        }
        Ok(response)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("name", &self.name())
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Provider:[{}]>", self.name())
    }
}
