//! Read-style provider resources (rooms, channels, users, ...).

use super::environment::{EnvSource, ProcessEnv};
use super::resource::{CallOptions, Pipeline, SchemaResource};
use super::schema::Schema;
use super::Data;
use crate::error::NotifierResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A fetchable resource exposed by a provider
///
/// Shares the schema pipeline with [`super::Provider`] but reads instead of
/// sending. Fetch failures are returned as [`crate::error::NotifierError::Resource`].
#[async_trait]
pub trait ProviderResource: SchemaResource {
    /// Name of the resource, e.g. `rooms`
    fn resource_name(&self) -> &str;

    /// Fetches the resource with processed data
    async fn get_resource(&self, data: Data) -> NotifierResult<Value>;
}

/// A provider resource bound to its processing pipeline
#[derive(Clone)]
pub struct Fetcher {
    resource: Arc<dyn ProviderResource>,
    pipeline: Arc<Pipeline>,
}

impl Fetcher {
    pub fn new(resource: Box<dyn ProviderResource>) -> Self {
        Self::with_env(resource, Arc::new(ProcessEnv))
    }

    pub fn with_env(resource: Box<dyn ProviderResource>, env: Arc<dyn EnvSource>) -> Self {
        Self {
            resource: Arc::from(resource),
            pipeline: Arc::new(Pipeline::new(env)),
        }
    }

    /// Name of the owning provider
    pub fn name(&self) -> &str {
        self.resource.name()
    }

    pub fn resource_name(&self) -> &str {
        self.resource.resource_name()
    }

    pub fn schema(&self) -> NotifierResult<&Schema> {
        self.pipeline.schema(self.resource.as_ref())
    }

    pub fn arguments(&self) -> NotifierResult<Map<String, Value>> {
        Ok(self.schema()?.arguments_json())
    }

    pub fn required(&self) -> Vec<String> {
        self.resource.required().iter().map(|s| s.to_string()).collect()
    }

    /// Validates `data` and fetches the resource
    pub async fn process_and_fetch(&self, data: Data) -> NotifierResult<Value> {
        self.process_and_fetch_with(data, &CallOptions::default()).await
    }

    pub async fn process_and_fetch_with(
        &self,
        data: Data,
        options: &CallOptions,
    ) -> NotifierResult<Value> {
        let data = self.pipeline.process(self.resource.as_ref(), data, options)?;
        tracing::info!(
            provider = self.name(),
            resource = self.resource_name(),
            "fetching resource"
        );
        self.resource.get_resource(data).await
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("provider", &self.name())
            .field("resource", &self.resource_name())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ProviderResource,provider={},resource={}>",
            self.name(),
            self.resource_name()
        )
    }
}
