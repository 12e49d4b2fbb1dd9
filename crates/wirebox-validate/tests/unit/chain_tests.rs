//! Unit tests for dependency chain validation and introspection

use crate::fixtures::{
    Cache, ConsoleLogger, FakeRegistry, RequestHandler, console_logger, logger_key, repository_key,
    sql_repository,
};
use wirebox_domain::{Constructor, Error, Implementation, Parameter, ServiceKey};
use wirebox_validate::{
    constructor_dependencies, dependency_edges, unresolved_dependencies, validate_dependency_chain,
};

#[test]
fn test_introspection_skips_primitives() {
    let dependencies = constructor_dependencies(&sql_repository());
    assert_eq!(dependencies.len(), 1);
    assert_eq!(dependencies[0].parameter, "logger");
    assert_eq!(dependencies[0].key, logger_key());
    assert!(dependencies[0].required);
}

#[test]
fn test_introspection_skips_value_parameters_of_service_types() {
    let implementation = Implementation::of::<ConsoleLogger>().with_constructor(
        Constructor::new()
            .param(Parameter::value::<ConsoleLogger>("template"))
            .param(Parameter::service::<dyn Cache>("cache")),
    );
    let dependencies = constructor_dependencies(&implementation);
    assert_eq!(dependencies.len(), 1);
    assert_eq!(dependencies[0].parameter, "cache");

    let errors = unresolved_dependencies(
        &ServiceKey::of::<ConsoleLogger>(),
        &implementation,
        &FakeRegistry::new(),
    );
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        Error::UnresolvedDependency { key, .. } if *key == ServiceKey::of::<dyn Cache>()
    ));
}

#[test]
fn test_introspection_marks_defaulted_parameters() {
    let dependencies = constructor_dependencies(&Implementation::of::<RequestHandler>());
    assert_eq!(dependencies.len(), 2);
    assert!(dependencies[0].required);
    assert_eq!(dependencies[1].key, ServiceKey::of::<dyn Cache>());
    assert!(!dependencies[1].required);
}

#[test]
fn test_edges_carry_parameter_names() {
    let edges = dependency_edges(&repository_key(), &sql_repository());
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].from, repository_key());
    assert_eq!(edges[0].to.to_string(), "dyn Logger");
    assert_eq!(edges[0].to_string(), "dyn Repository -> dyn Logger (logger)");
}

#[test]
fn test_missing_dependency_names_requester() {
    let registry = FakeRegistry::new().with(repository_key(), sql_repository());
    let error = validate_dependency_chain(&repository_key(), &sql_repository(), &registry)
        .expect_err("logger is not registered");

    match error {
        Error::UnresolvedDependency {
            key,
            requested_by,
            known,
            ..
        } => {
            assert_eq!(key, logger_key());
            assert_eq!(requested_by, Some(repository_key()));
            assert_eq!(known, vec![repository_key()]);
        }
        other => panic!("expected unresolved dependency, got {other:?}"),
    }
}

#[test]
fn test_registered_dependency_passes() {
    let registry = FakeRegistry::new()
        .with(repository_key(), sql_repository())
        .with(logger_key(), console_logger());
    validate_dependency_chain(&repository_key(), &sql_repository(), &registry)
        .expect("logger is registered");
}

#[test]
fn test_opaque_bindings_satisfy_dependencies() {
    let registry = FakeRegistry::new().with_opaque(logger_key());
    validate_dependency_chain(&repository_key(), &sql_repository(), &registry)
        .expect("factory-bound logger counts as registered");
}

#[test]
fn test_optional_dependencies_are_not_required() {
    let handler = Implementation::of::<RequestHandler>();
    let registry = FakeRegistry::new().with_opaque(repository_key());
    assert!(unresolved_dependencies(&ServiceKey::of::<RequestHandler>(), &handler, &registry).is_empty());
}
