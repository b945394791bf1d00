//! Notifiers Library
//!
//! One interface for sending notifications through many providers. Each
//! provider declares the arguments it accepts as a structural schema;
//! arguments are validated, completed from the environment and from
//! defaults, then handed to the provider.
//!
//! ```ignore
//! use notifiers::get_notifier;
//!
//! let notifier = get_notifier("webhook").expect("built-in provider");
//! let mut data = notifiers::Data::new();
//! data.insert("url".into(), "https://example.com/hook".into());
//! data.insert("message".into(), "deployed".into());
//! let response = notifier.notify(data).await?;
//! response.raise_on_errors()?;
//! ```

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod external;
pub mod logger;
pub mod providers;
pub mod registry;

pub use crate::core::{
    CallOptions, Data, Fetcher, Notifier, Provider, ProviderResource, Response, ResponseStatus,
    SchemaResource,
};
pub use error::{NotifierError, NotifierResult};
pub use registry::{ProviderRegistry, all_providers, get_notifier, install};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
