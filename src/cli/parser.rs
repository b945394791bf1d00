//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use super::validation::{parse_key_value, validate_config_file_path, validate_env_prefix};
use crate::core::Data;

/// Send notifications through any registered provider
#[derive(Parser, Debug)]
#[command(name = "notifiers")]
#[command(about = "Send notifications through any registered provider")]
#[command(long_about = "
notifiers sends notifications through pluggable providers. Every provider
declares the arguments it accepts; arguments come from the command line,
from NOTIFIERS_<PROVIDER>_<ARGUMENT> environment variables, or from the
provider's defaults, in that order.

EXAMPLES:
    # List available providers
    notifiers providers

    # Show what a provider accepts
    notifiers info webhook

    # Send a notification
    notifiers notify webhook -a url=https://example.com/hook --message \"deployed\"

    # Read the message from stdin
    echo \"deployed\" | notifiers notify webhook -a url=https://example.com/hook

    # Take the URL from the environment
    NOTIFIERS_WEBHOOK_URL=https://example.com/hook notifiers notify webhook --message hi

    # Use custom configuration file
    notifiers --config /path/to/notifiers.toml notify webhook --message hi
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// TOML file with [logger], [http] and [notify] sections. Falls back to
    /// NOTIFIERS_CONFIG_FILE when not given. The file must exist and be readable.
    ///
    /// Example: --config /etc/notifiers.toml
    #[arg(short, long, value_name = "FILE", value_parser = validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    ///
    /// Increases log output to debug level.
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only.
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered providers
    Providers,

    /// Show a provider's metadata, arguments, defaults and resources as JSON
    ///
    /// Examples:
    ///   notifiers info webhook
    Info {
        /// Provider name
        provider: String,
    },

    /// Send a notification
    ///
    /// Prints the response as JSON. Remote failures are reported in the
    /// response and only fail the command with --raise-on-errors.
    ///
    /// Examples:
    ///   notifiers notify webhook -a url=https://example.com/hook --message hi
    ///   notifiers notify webhook -a url=https://example.com/hook -a timeout=5 --message hi
    Notify {
        /// Provider name
        provider: String,

        /// Provider argument as key=value, repeatable
        ///
        /// Values that parse as JSON are sent as JSON, otherwise as strings.
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        args: Vec<(String, Value)>,

        /// Notification message, read from stdin when absent and stdin is piped
        #[arg(short, long)]
        message: Option<String>,

        /// Prefix for provider environment variables
        ///
        /// Default: NOTIFIERS
        #[arg(long, value_name = "PREFIX", value_parser = validate_env_prefix)]
        env_prefix: Option<String>,

        /// Exit with an error when the response reports errors
        #[arg(long)]
        raise_on_errors: bool,
    },

    /// Fetch a provider resource
    ///
    /// Examples:
    ///   notifiers resource chat rooms -a token=secret
    Resource {
        /// Provider name
        provider: String,

        /// Resource name
        resource: String,

        /// Resource argument as key=value, repeatable
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        args: Vec<(String, Value)>,

        /// Prefix for provider environment variables
        #[arg(long, value_name = "PREFIX", value_parser = validate_env_prefix)]
        env_prefix: Option<String>,
    },
}

impl Cli {
    /// Log level implied by --verbose or --quiet, if any
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

/// Collects repeated `key=value` arguments, later keys win
pub fn into_data(args: &[(String, Value)]) -> Data {
    args.iter().cloned().collect()
}
