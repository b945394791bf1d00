//! Providers and info command handler

use serde_json::{Value, json};

use crate::error::NotifierResult;
use crate::registry;

/// Handler for listing and describing providers
#[derive(Debug, Default)]
pub struct ProvidersCommandHandler;

impl ProvidersCommandHandler {
    pub fn new() -> Self {
        Self
    }

    /// Registered provider names, in registration order
    pub fn list(&self) -> Vec<String> {
        registry::all_providers()
    }

    /// Everything a caller needs to know to use `provider`
    pub fn describe(&self, provider: &str) -> NotifierResult<Value> {
        let notifier = registry::require_notifier(provider)?;
        Ok(json!({
            "name": notifier.name(),
            "metadata": notifier.metadata(),
            "required": notifier.required(),
            "arguments": notifier.arguments()?,
            "defaults": notifier.defaults(),
            "resources": notifier.resources(),
        }))
    }
}
