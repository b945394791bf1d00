//! Configuration management for the `notifiers` binary
//!
//! # Configuration Priority (lowest to highest)
//! 1. Built-in defaults
//! 2. TOML file given with `--config` or `NOTIFIERS_CONFIG_FILE`
//! 3. `NOTIFIERS__SECTION__KEY` environment variables
//!
//! The double underscore after the prefix keeps these apart from provider
//! arguments such as `NOTIFIERS_WEBHOOK_URL`.

pub mod error;
pub mod loader;
pub mod settings;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{HttpSettings, LoggerSettings, NotifySettings, Settings};
