use std::sync::Arc;
use std::thread;

use litepost_core::environment::DEFAULT_ENVIRONMENT_ID;
use litepost_core::{Environment, EnvironmentError, EnvironmentRegistry, Request};

#[test]
fn new_registry_is_seeded_with_builtins() {
    let registry = EnvironmentRegistry::new();
    let ids: Vec<String> = registry.list().iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, vec!["default", "development", "production"]);

    let default = registry.get(DEFAULT_ENVIRONMENT_ID).unwrap();
    assert_eq!(default.variable("base_url"), Some("https://api.example.com"));
}

#[test]
fn set_overrides_existing_entry() {
    let registry = EnvironmentRegistry::new();
    let prev = registry.set(Environment::new("development", "Dev").with_variable("base_url", "http://dev"));
    assert!(prev.is_some());
    assert_eq!(
        registry.get("development").unwrap().variable("base_url"),
        Some("http://dev")
    );
}

#[test]
fn substitute_with_empty_id_is_identity() {
    let registry = EnvironmentRegistry::empty();
    assert_eq!(registry.substitute("{{x}}", "").unwrap(), "{{x}}");

    let mut req = Request::new("r");
    req.url = "{{base_url}}".to_string();
    registry.substitute_request(&mut req, "").unwrap();
    assert_eq!(req.url, "{{base_url}}");
}

#[test]
fn substitute_with_unknown_environment_fails() {
    let registry = EnvironmentRegistry::empty();
    let err = registry.substitute("{{x}}", "missing").unwrap_err();
    assert_eq!(err, EnvironmentError::NotFound("missing".to_string()));
    assert_eq!(err.to_string(), "environment not found: missing");
}

#[test]
fn concurrent_reads_and_writes() {
    let registry = Arc::new(EnvironmentRegistry::new());
    let mut handles = Vec::new();
    for i in 0..8 {
        let registry = registry.clone();
        handles.push(thread::spawn(move || {
            let id = format!("env-{i}");
            registry.set(Environment::new(&id, "t").with_variable("n", i.to_string()));
            for _ in 0..100 {
                assert!(registry.get(DEFAULT_ENVIRONMENT_ID).is_ok());
            }
            registry.substitute("{{n}}", &id).unwrap()
        }));
    }
    let mut outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    outputs.sort();
    assert_eq!(outputs, (0..8).map(|i| i.to_string()).collect::<Vec<_>>());
    assert_eq!(registry.len(), 11);
}

#[test]
fn remove_drops_entry() {
    let registry = EnvironmentRegistry::new();
    assert!(registry.remove("production").is_some());
    assert!(!registry.contains("production"));
    assert!(registry.remove("production").is_none());
}
