//! CLI module for the `notifiers` binary
//!
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config file + environment)
//! - Command handlers for providers, info, notify and resource

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::{CommandOutput, execute_command, run_command};
pub use parser::{Cli, Commands};

use crate::config::settings::Settings;
use crate::error::NotifierResult;
use crate::logger::init_logger;

/// Load configuration and apply CLI overrides
///
/// # Errors
/// Returns error if configuration loading, merging, or validation fails
pub fn load_and_merge_config(cli: &Cli) -> NotifierResult<Settings> {
    let merger = ConfigurationMerger::from_config_path(cli.config.as_deref())?;
    Ok(merger.merge_cli_args(cli)?)
}

/// Initialize logger from settings
///
/// # Errors
/// Returns error if the logger configuration is invalid or a global
/// subscriber is already installed
pub fn init_logger_from_settings(settings: &Settings) -> NotifierResult<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)?;
    Ok(())
}
