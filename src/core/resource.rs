//! Schema resources and the shared processing pipeline.
//!
//! Both providers (send) and provider resources (fetch) declare a schema and
//! run caller data through the same [`Pipeline`] before acting on it.

use super::environment::{DEFAULT_ENV_PREFIX, EnvSource, ProcessEnv, collect_environs};
use super::response::{RawResponse, Response};
use super::schema::{Schema, SchemaSyntaxError};
use super::validation::{best_match, iter_errors};
use super::Data;
use crate::error::{NotifierError, NotifierResult};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Reserved data key that selects the environment prefix for one call
pub const ENV_PREFIX_KEY: &str = "env_prefix";

/// An object described by an argument schema
///
/// Implementors declare the schema; the processing itself is done by
/// [`Pipeline`]. All hooks have identity or no-op defaults.
pub trait SchemaResource: Send + Sync {
    /// Unique provider name, used for registry lookup and environment keys
    fn name(&self) -> &str;

    /// Names of the mandatory arguments
    fn required(&self) -> &[&str];

    /// JSON schema fragment without the required part.
    ///
    /// Holds `properties` and optional object-level keywords such as
    /// `additionalProperties` or `dependencies`.
    fn schema_fragment(&self) -> Value;

    /// Values used for arguments the caller and the environment left out
    fn defaults(&self) -> Data {
        Data::new()
    }

    /// Reshapes validated data to fit the provider's wire format
    fn prepare_data(&self, data: Data) -> Data {
        data
    }

    /// Checks relationships between arguments that the schema cannot express
    fn validate_data_dependencies(&self, data: Data) -> NotifierResult<Data> {
        Ok(data)
    }

    /// Convenience constructor for a [`Response`] attributed to this resource
    fn create_response(
        &self,
        data: Data,
        raw_response: Option<RawResponse>,
        errors: Vec<String>,
    ) -> Response {
        Response::new(self.name(), data, raw_response, errors)
    }
}

/// Per-call control parameters, kept apart from the argument data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Environment prefix, `NOTIFIERS` when absent
    pub env_prefix: Option<String>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }
}

/// Validation and enrichment pipeline bound to one resource instance.
///
/// The merged schema is computed on first use and cached for the lifetime of
/// the pipeline.
pub struct Pipeline {
    merged: OnceLock<Result<Schema, SchemaSyntaxError>>,
    env: Arc<dyn EnvSource>,
}

impl Pipeline {
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self {
            merged: OnceLock::new(),
            env,
        }
    }

    /// Merged and checked schema of `resource`
    ///
    /// # Errors
    /// [`NotifierError::Schema`] when the declared schema is invalid.
    pub fn schema<R>(&self, resource: &R) -> NotifierResult<&Schema>
    where
        R: SchemaResource + ?Sized,
    {
        let merged = self.merged.get_or_init(|| {
            tracing::debug!(provider = resource.name(), "merging required into schema");
            let required: Vec<String> = resource.required().iter().map(|s| s.to_string()).collect();
            Schema::from_parts(resource.schema_fragment(), &required)
        });

        merged.as_ref().map_err(|e| NotifierError::Schema {
            provider: resource.name().to_string(),
            message: e.to_string(),
        })
    }

    /// Runs the full pipeline on caller data
    ///
    /// Order: schema self-check, environment overlay, structural validation,
    /// provider shaping, default merge, dependency check.
    ///
    /// # Errors
    /// - [`NotifierError::Schema`] when the provider schema is invalid
    /// - [`NotifierError::BadArguments`] when the data violates the schema
    /// - whatever the resource's dependency check returns
    pub fn process<R>(&self, resource: &R, mut data: Data, options: &CallOptions) -> NotifierResult<Data>
    where
        R: SchemaResource + ?Sized,
    {
        let name = resource.name();
        tracing::debug!(provider = name, "validating provider schema");
        let schema = self.schema(resource)?;

        let prefix = resolve_prefix(name, &mut data, options)?;
        let environs = collect_environs(self.env.as_ref(), &prefix, name, schema.arguments());
        if !environs.is_empty() {
            merge_missing(&mut data, environs);
        }

        tracing::debug!(provider = name, "validating provided data");
        let violations = iter_errors(schema, &Value::Object(data.clone()));
        if let Some(violation) = best_match(violations) {
            return Err(NotifierError::BadArguments {
                provider: name.to_string(),
                message: violation.display_message().to_string(),
                data,
            });
        }

        let mut data = resource.prepare_data(data);

        let defaults = resource.defaults();
        tracing::debug!(provider = name, defaults = ?defaults, "merging defaults");
        merge_missing(&mut data, defaults);

        resource.validate_data_dependencies(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Arc::new(ProcessEnv))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("merged", &self.merged.get().map(|r| r.is_ok()))
            .finish_non_exhaustive()
    }
}

/// Inserts every entry of `source` whose key is missing from `target`
pub fn merge_missing(target: &mut Data, source: Data) {
    for (key, value) in source {
        target.entry(key).or_insert(value);
    }
}

/// Explicit options win over a reserved `env_prefix` key in the data; the key
/// is always removed so it never reaches the provider.
fn resolve_prefix(provider: &str, data: &mut Data, options: &CallOptions) -> NotifierResult<String> {
    let reserved = match data.remove(ENV_PREFIX_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::String(prefix)) => Some(prefix),
        Some(other) => {
            return Err(NotifierError::BadArguments {
                provider: provider.to_string(),
                message: format!("{ENV_PREFIX_KEY} must be a string, got {other}"),
                data: data.clone(),
            });
        }
    };

    let prefix = options
        .env_prefix
        .clone()
        .or(reserved)
        .filter(|prefix| !prefix.is_empty());

    Ok(match prefix {
        Some(prefix) => prefix,
        None => {
            tracing::debug!("using default environ prefix");
            DEFAULT_ENV_PREFIX.to_string()
        }
    })
}
