//! Schema-driven core shared by every provider.
//!
//! - [`schema`] and [`validation`]: typed structural rules and their Draft 4 checker
//! - [`environment`]: environment overlay sources
//! - [`resource`]: the `SchemaResource` contract and the processing pipeline
//! - [`provider`] and [`provider_resource`]: send and fetch contracts
//! - [`response`]: the immutable result of a send

pub mod environment;
pub mod provider;
pub mod provider_resource;
pub mod resource;
pub mod response;
pub mod schema;
pub mod validation;

pub use environment::{DEFAULT_ENV_PREFIX, EnvSource, MapEnv, ProcessEnv};
pub use provider::{Notifier, Provider, ProviderMetadata};
pub use provider_resource::{Fetcher, ProviderResource};
pub use resource::{CallOptions, ENV_PREFIX_KEY, Pipeline, SchemaResource};
pub use response::{RawResponse, Response, ResponseStatus};
pub use schema::{Rule, RuleKind, Schema, SchemaSyntaxError};

/// Argument data: name to value, as given by the caller or after processing
pub type Data = serde_json::Map<String, serde_json::Value>;
