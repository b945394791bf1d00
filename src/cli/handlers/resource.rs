//! Resource command handler

use serde_json::Value;

use crate::config::NotifySettings;
use crate::core::Data;
use crate::error::NotifierResult;
use crate::registry;

/// Handler for the resource command
pub struct ResourceCommandHandler {
    settings: NotifySettings,
}

impl ResourceCommandHandler {
    pub fn new(settings: NotifySettings) -> Self {
        Self { settings }
    }

    /// Fetches `resource` from `provider` with `data`
    pub async fn execute(&self, provider: &str, resource: &str, data: Data) -> NotifierResult<Value> {
        let fetcher = registry::require_notifier(provider)?.resource(resource)?;
        fetcher
            .process_and_fetch_with(data, &self.settings.call_options())
            .await
    }
}
