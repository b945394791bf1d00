//! Process-wide registry round trip.

mod common;

use std::sync::Once;

use common::{Dummy, Layered};
use notifiers::providers::register_builtin;
use notifiers::registry::{self, ProviderRegistry};
use notifiers::{NotifierError, all_providers, get_notifier, install};

static INSTALL: Once = Once::new();

fn setup() {
    INSTALL.call_once(|| {
        let mut registry = ProviderRegistry::new();
        registry
            .register(|| Dummy)
            .unwrap()
            .register(|| Layered)
            .unwrap();
        register_builtin(&mut registry);
        install(registry).unwrap();
    });
}

#[test]
fn test_registered_names_listed_once() {
    setup();
    let names = all_providers();
    assert_eq!(names, vec!["dummy", "layered", "webhook"]);
    for name in &names {
        assert_eq!(names.iter().filter(|n| *n == name).count(), 1);
    }
}

#[test]
fn test_lookup_by_name() {
    setup();
    let notifier = get_notifier("dummy").unwrap();
    assert_eq!(notifier.name(), "dummy");
    assert_eq!(notifier.metadata().site_url, "https://dummy.test");
    assert!(get_notifier("pigeon").is_none());
}

#[test]
fn test_require_unknown_provider() {
    setup();
    let err = registry::require_notifier("pigeon").unwrap_err();
    assert_eq!(err.to_string(), "Unknown provider: pigeon");
}

#[test]
fn test_second_install_rejected() {
    setup();
    let err = install(ProviderRegistry::new()).unwrap_err();
    assert!(matches!(err, NotifierError::RegistryAlreadyInitialized));
    assert!(registry::global().contains("dummy"));
}
