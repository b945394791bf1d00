//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::fmt;

use serde_json::Value;

use super::handlers::notify::read_piped_stdin;
use super::handlers::{NotifyCommandHandler, ProvidersCommandHandler, ResourceCommandHandler};
use super::parser::{Cli, Commands, into_data};
use crate::config::settings::Settings;
use crate::core::{ProcessEnv, Response};
use crate::error::NotifierResult;

/// What a command produced, ready to print
#[derive(Debug)]
pub enum CommandOutput {
    /// One item per line
    Lines(Vec<String>),
    /// Pretty-printed JSON document
    Json(Value),
    /// Notification response, printed as JSON
    Response(Response),
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Lines(lines) => write!(f, "{}", lines.join("\n")),
            CommandOutput::Json(value) => write_json(f, value),
            CommandOutput::Response(response) => {
                let value = serde_json::to_value(response).map_err(|_| fmt::Error)?;
                write_json(f, &value)
            }
        }
    }
}

fn write_json(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    let text = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
    f.write_str(&text)
}

/// Execute a CLI command and print its output to stdout
///
/// # Errors
/// Returns errors from command handlers, and the response errors of a
/// notification when `raise_on_errors` is set.
pub async fn execute_command(cli: &Cli, settings: Settings) -> NotifierResult<()> {
    let raise_on_errors = settings.notify.raise_on_errors;
    let output = run_command(cli, settings, read_piped_stdin).await?;
    println!("{}", output);

    if let CommandOutput::Response(response) = &output {
        if raise_on_errors {
            response.raise_on_errors()?;
        }
    }
    Ok(())
}

/// Run a command without printing
///
/// `stdin` supplies the piped message for `notify` when none was given.
pub async fn run_command(
    cli: &Cli,
    settings: Settings,
    stdin: impl FnOnce() -> Option<String>,
) -> NotifierResult<CommandOutput> {
    match &cli.command {
        Commands::Providers => Ok(CommandOutput::Lines(ProvidersCommandHandler::new().list())),
        Commands::Info { provider } => ProvidersCommandHandler::new()
            .describe(provider)
            .map(CommandOutput::Json),
        Commands::Notify {
            provider,
            args,
            message,
            ..
        } => {
            let data = into_data(args);
            let handler = NotifyCommandHandler::new(settings.notify);
            let message = handler.resolve_message(provider, message.clone(), &data, &ProcessEnv, stdin);
            let response = handler.execute(provider, data, message).await?;
            tracing::info!(%response, "notification sent");
            Ok(CommandOutput::Response(response))
        }
        Commands::Resource {
            provider,
            resource,
            args,
            ..
        } => ResourceCommandHandler::new(settings.notify)
            .execute(provider, resource, into_data(args))
            .await
            .map(CommandOutput::Json),
    }
}
