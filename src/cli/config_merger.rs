//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override configuration file and environment values.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};
use std::path::Path;

/// Applies CLI overrides on top of file-based configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration from `config_path`, or from the default loader
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_config_path(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => ConfigLoader::new().with_file(path),
            None => ConfigLoader::new(),
        };
        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// Global flags are applied first, then command-specific ones.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if let Some(level) = cli.log_level_override() {
            config.logger.level = level.to_string();
        }

        match &cli.command {
            Commands::Notify {
                env_prefix,
                raise_on_errors,
                ..
            } => {
                if let Some(prefix) = env_prefix {
                    config.notify.env_prefix = Some(prefix.clone());
                }
                if *raise_on_errors {
                    config.notify.raise_on_errors = true;
                }
            }
            Commands::Resource {
                env_prefix: Some(prefix),
                ..
            } => {
                config.notify.env_prefix = Some(prefix.clone());
            }
            _ => {}
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
