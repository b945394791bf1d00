//! Notify command handler

use std::io::{IsTerminal, Read};

use serde_json::Value;

use crate::config::NotifySettings;
use crate::core::environment::environ_key;
use crate::core::{DEFAULT_ENV_PREFIX, Data, ENV_PREFIX_KEY, EnvSource, Response};
use crate::error::NotifierResult;
use crate::registry;

const MESSAGE_KEY: &str = "message";

/// Handler for the notify command
pub struct NotifyCommandHandler {
    settings: NotifySettings,
}

impl NotifyCommandHandler {
    pub fn new(settings: NotifySettings) -> Self {
        Self { settings }
    }

    /// Sends `data` through `provider`
    ///
    /// `message`, when given, overrides any `message` argument in `data`.
    /// The returned response may still carry remote errors.
    pub async fn execute(
        &self,
        provider: &str,
        mut data: Data,
        message: Option<String>,
    ) -> NotifierResult<Response> {
        let notifier = registry::require_notifier(provider)?;
        if let Some(message) = message {
            data.insert(MESSAGE_KEY.to_string(), message.into());
        }

        notifier.notify_with(data, &self.settings.call_options()).await
    }

    /// Picks the message to send: the explicit one, else piped input
    ///
    /// `piped` is only consulted when neither `--message`, a `message`
    /// argument nor the provider's message variable in `env` supplies one.
    pub fn resolve_message(
        &self,
        provider: &str,
        explicit: Option<String>,
        data: &Data,
        env: &dyn EnvSource,
        piped: impl FnOnce() -> Option<String>,
    ) -> Option<String> {
        if explicit.is_some() || data.contains_key(MESSAGE_KEY) {
            return explicit;
        }

        // Same precedence as the pipeline: configured, reserved key, default
        let prefix = self
            .settings
            .env_prefix
            .as_deref()
            .or_else(|| data.get(ENV_PREFIX_KEY).and_then(Value::as_str))
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(DEFAULT_ENV_PREFIX);
        let key = environ_key(prefix, provider, MESSAGE_KEY);
        if env.get(&key).is_some_and(|value| !value.is_empty()) {
            tracing::debug!(key = %key, "message taken from the environment");
            return None;
        }

        piped()
    }
}

/// Reads stdin when it is not a terminal
pub fn read_piped_stdin() -> Option<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return None;
    }

    let mut buffer = String::new();
    if let Err(e) = stdin.lock().read_to_string(&mut buffer) {
        tracing::warn!(error = %e, "failed to read message from stdin");
        return None;
    }

    let message = buffer.trim_end_matches(['\n', '\r']);
    (!message.is_empty()).then(|| message.to_string())
}
