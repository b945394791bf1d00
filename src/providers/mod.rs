//! Built-in provider collaborators.

mod webhook;

pub use webhook::WebhookProvider;

use crate::registry::ProviderRegistry;

/// Registry holding every built-in provider
pub fn builtin_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    register_builtin(&mut registry);
    registry
}

/// Registers the built-in providers into an existing registry
///
/// Names already present are left untouched, so a caller's own provider can
/// shadow a built-in one.
pub fn register_builtin(registry: &mut ProviderRegistry) {
    if let Err(e) = registry.register(WebhookProvider::new) {
        tracing::debug!(error = %e, "built-in provider shadowed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Data, Response, SchemaResource, Provider};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct CustomWebhook;

    impl SchemaResource for CustomWebhook {
        fn name(&self) -> &str {
            "webhook"
        }

        fn required(&self) -> &[&str] {
            &[]
        }

        fn schema_fragment(&self) -> Value {
            json!({"properties": {}})
        }
    }

    #[async_trait]
    impl Provider for CustomWebhook {
        fn base_url(&self) -> &str {
            "https://custom.test"
        }

        fn site_url(&self) -> &str {
            "https://custom.test"
        }

        async fn send_notification(&self, data: Data) -> Response {
            self.create_response(data, None, vec![])
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = builtin_registry();
        assert_eq!(registry.names(), vec!["webhook"]);
    }

    #[test]
    fn test_builtin_can_be_shadowed() {
        let mut registry = ProviderRegistry::new();
        registry.register(|| CustomWebhook).unwrap();
        register_builtin(&mut registry);

        assert_eq!(registry.len(), 1);
        let notifier = registry.lookup("webhook").unwrap();
        assert_eq!(notifier.metadata().base_url, "https://custom.test");
    }
}
