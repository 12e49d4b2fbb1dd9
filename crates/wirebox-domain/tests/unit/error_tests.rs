//! Unit tests for the error taxonomy

use wirebox_domain::{Error, Scope, ServiceKey};

trait Logger: Send + Sync {}
trait Repository: Send + Sync {}
trait Handler: Send + Sync {}

#[test]
fn test_unresolved_message_names_parent_root_and_known_keys() {
    let error = Error::UnresolvedDependency {
        key: ServiceKey::of::<dyn Logger>(),
        requested_by: Some(ServiceKey::of::<dyn Repository>()),
        root: Some(ServiceKey::of::<dyn Handler>()),
        known: vec![
            ServiceKey::of::<dyn Handler>(),
            ServiceKey::of::<dyn Repository>(),
        ],
    };

    let message = error.to_string();
    assert!(message.contains("dyn Logger is not registered"));
    assert!(message.contains("required by dyn Repository"));
    assert!(message.contains("while resolving dyn Handler"));
    assert!(message.contains("known services: dyn Handler, dyn Repository"));
}

#[test]
fn test_unresolved_message_without_registrations() {
    let error = Error::UnresolvedDependency {
        key: ServiceKey::of::<dyn Logger>(),
        requested_by: None,
        root: None,
        known: Vec::new(),
    };
    assert!(error.to_string().contains("no services are registered"));
}

#[test]
fn test_circular_message_renders_full_path() {
    let a = ServiceKey::of::<dyn Logger>();
    let b = ServiceKey::of::<dyn Repository>();
    let error = Error::circular(vec![a.clone(), b, a]);

    assert_eq!(
        error.to_string(),
        "Circular dependency detected: dyn Logger -> dyn Repository -> dyn Logger"
    );
    assert_eq!(error.cycle_path().map(<[ServiceKey]>::len), Some(3));
}

#[test]
fn test_contract_violation_lists_every_missing_member() {
    let error = Error::ContractViolation {
        capability: ServiceKey::of::<dyn Logger>(),
        implementation: "NullLogger".to_string(),
        missing: vec!["log".to_string(), "flush".to_string()],
    };
    assert!(error.to_string().contains("missing member(s): log, flush"));
    assert!(error.is_registration_error());
}

#[test]
fn test_validation_failed_aggregates_messages() {
    let error = Error::ValidationFailed {
        failures: vec![
            Error::configuration("first"),
            Error::internal("second"),
        ],
    };
    let message = error.to_string();
    assert!(message.starts_with("Validation failed with 2 error(s)"));
    assert!(message.contains("first"));
    assert!(message.contains("second"));
}

#[test]
fn test_scope_not_active_message() {
    let error = Error::ScopeNotActive {
        key: ServiceKey::of::<dyn Logger>(),
        scope: Scope::Request,
    };
    assert_eq!(
        error.to_string(),
        "Service dyn Logger is request-scoped but no request scope is active"
    );
    assert!(!error.is_registration_error());
}

#[test]
fn test_configuration_with_source_keeps_source() {
    use std::error::Error as _;

    let io = std::io::Error::other("disk");
    let error = Error::configuration_with_source("bad file", io);
    assert!(error.source().is_some());
}
