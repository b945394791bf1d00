//! Process-wide provider registry.
//!
//! Providers register a constructor under their unique name. The registry is
//! installed once with [`install`] and is read-only afterwards. When nothing
//! was installed, the first lookup installs the built-in providers.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::core::{EnvSource, Notifier, ProcessEnv, Provider};
use crate::error::{NotifierError, NotifierResult};

type ProviderFactory = Box<dyn Fn() -> Box<dyn Provider> + Send + Sync>;

static REGISTRY: OnceLock<ProviderRegistry> = OnceLock::new();

/// Registry mapping provider names to provider constructors
pub struct ProviderRegistry {
    factories: IndexMap<String, ProviderFactory>,
    env: Arc<dyn EnvSource>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
            env: Arc::new(ProcessEnv),
        }
    }

    /// Environment source handed to every notifier this registry builds
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// Register a provider constructor, keyed by the name of the provider it builds
    ///
    /// # Errors
    /// [`NotifierError::DuplicateProvider`] when the name is already taken.
    pub fn register<F, P>(&mut self, constructor: F) -> NotifierResult<&mut Self>
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: Provider + 'static,
    {
        let name = constructor().name().to_string();
        if self.factories.contains_key(&name) {
            return Err(NotifierError::DuplicateProvider { name });
        }

        tracing::debug!(provider = %name, "registering provider");
        let factory: ProviderFactory = Box::new(move || Box::new(constructor()) as Box<dyn Provider>);
        self.factories.insert(name, factory);
        Ok(self)
    }

    /// Build a notifier for `name`
    pub fn lookup(&self, name: &str) -> Option<Notifier> {
        let factory = self.factories.get(name)?;
        tracing::debug!(provider = name, "found a match, returning");
        Some(Notifier::with_env(factory(), self.env.clone()))
    }

    /// All registered names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish_non_exhaustive()
    }
}

/// Install the process-wide registry
///
/// # Errors
/// [`NotifierError::RegistryAlreadyInitialized`] when a registry was already
/// installed or the built-in one was created by an earlier lookup.
pub fn install(registry: ProviderRegistry) -> NotifierResult<()> {
    REGISTRY
        .set(registry)
        .map_err(|_| NotifierError::RegistryAlreadyInitialized)
}

/// The process-wide registry, installing the built-in providers if needed
pub fn global() -> &'static ProviderRegistry {
    REGISTRY.get_or_init(crate::providers::builtin_registry)
}

/// Convenience method returning a ready [`Notifier`] for `name`, if registered
pub fn get_notifier(name: &str) -> Option<Notifier> {
    global().lookup(name)
}

/// Names of every registered provider
pub fn all_providers() -> Vec<String> {
    global().names()
}

/// Like [`get_notifier`] but reports unknown names as an error
pub fn require_notifier(name: &str) -> NotifierResult<Notifier> {
    get_notifier(name).ok_or_else(|| NotifierError::ProviderNotFound {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Data, MapEnv, Response, SchemaResource};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Named(&'static str);

    impl SchemaResource for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn required(&self) -> &[&str] {
            &[]
        }

        fn schema_fragment(&self) -> Value {
            json!({"properties": {"message": {"type": "string"}}})
        }
    }

    #[async_trait]
    impl Provider for Named {
        fn base_url(&self) -> &str {
            ""
        }

        fn site_url(&self) -> &str {
            ""
        }

        async fn send_notification(&self, data: Data) -> Response {
            self.create_response(data, None, vec![])
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(|| Named("first"))
            .unwrap()
            .register(|| Named("second"))
            .unwrap();

        assert_eq!(registry.names(), vec!["first", "second"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("second").unwrap().name(), "second");
        assert!(registry.lookup("third").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = ProviderRegistry::new();
        registry.register(|| Named("dup")).unwrap();
        let err = registry.register(|| Named("dup")).err().unwrap();
        assert!(matches!(err, NotifierError::DuplicateProvider { ref name } if name == "dup"));
        assert_eq!(registry.names(), vec!["dup"]);
    }

    #[test]
    fn test_lookup_uses_registry_env() {
        let mut registry = ProviderRegistry::new()
            .with_env(Arc::new(MapEnv::new().with("NOTIFIERS_ENVY_MESSAGE", "from env")));
        registry.register(|| Named("envy")).unwrap();

        let processed = registry
            .lookup("envy")
            .unwrap()
            .process(Data::new(), &Default::default())
            .unwrap();
        assert_eq!(processed["message"], "from env");
    }

    #[test]
    fn test_each_lookup_is_a_new_instance() {
        let mut registry = ProviderRegistry::new();
        registry.register(|| Named("fresh")).unwrap();
        let first = registry.lookup("fresh").unwrap();
        let second = registry.lookup("fresh").unwrap();
        let a = first.schema().unwrap() as *const _;
        let b = second.schema().unwrap() as *const _;
        assert_ne!(a, b);
    }
}
