//! Service Registry Tests

use crate::test_utils::{
    BrokenConnection, Connection, Logger, MemoryLogger, Repository, memory_cache, memory_logger,
    sql_repository,
};
use std::sync::Arc;
use wirebox_domain::{
    Binding, Contract, Error, Implementation, Scope, ServiceDescriptor, ServiceInstance,
    ServiceKey,
};
use wirebox_runtime::ServiceRegistry;

fn logger_key() -> ServiceKey {
    ServiceKey::of::<dyn Logger>()
}

fn logger_instance() -> ServiceInstance {
    let logger: Arc<dyn Logger> = Arc::new(MemoryLogger::default());
    ServiceInstance::new(logger_key(), logger)
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_register_and_lookup() {
    let registry = ServiceRegistry::new();
    registry
        .register_singleton(logger_key(), memory_logger())
        .unwrap();

    assert!(registry.is_registered(&logger_key()));
    assert!(!registry.is_registered(&ServiceKey::of::<dyn Repository>()));
    assert_eq!(registry.len(), 1);

    let implementation = registry.get_service_implementation(&logger_key()).unwrap();
    assert!(implementation.type_name().ends_with("MemoryLogger"));
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let registry = ServiceRegistry::new();
    registry
        .register_singleton(logger_key(), memory_logger())
        .unwrap();

    let err = registry
        .register_transient(logger_key(), memory_logger())
        .unwrap_err();

    assert!(matches!(err, Error::AlreadyRegistered { ref key } if *key == logger_key()));
    assert!(err.is_registration_error());
    assert_eq!(
        registry.get_descriptor(&logger_key()).unwrap().scope(),
        Scope::Singleton
    );
}

#[test]
fn test_replace_returns_previous_and_evicts_singleton() {
    let registry = ServiceRegistry::new();
    registry
        .register_singleton(logger_key(), memory_logger())
        .unwrap();
    registry
        .set_singleton_instance(logger_key(), logger_instance())
        .unwrap();

    let replacement = registry
        .replace(ServiceDescriptor::transient(memory_logger()))
        .unwrap();

    assert!(replacement.previous.is_some());
    assert!(replacement.evicted.is_some());
    assert!(!registry.has_singleton(&logger_key()));
    assert_eq!(
        registry.get_descriptor(&logger_key()).unwrap().scope(),
        Scope::Transient
    );
}

#[test]
fn test_replace_of_unknown_key_inserts() {
    let registry = ServiceRegistry::new();
    let replacement = registry
        .replace(ServiceDescriptor::singleton(memory_logger()))
        .unwrap();

    assert!(replacement.previous.is_none());
    assert!(replacement.evicted.is_none());
    assert!(registry.is_registered(&logger_key()));
}

#[test]
fn test_interface_marker_is_rejected() {
    let registry = ServiceRegistry::new();
    let err = registry
        .register_singleton(logger_key(), Implementation::interface_marker::<dyn Logger>())
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("abstract"));
    assert!(registry.is_empty());
}

#[test]
fn test_mismatched_key_is_rejected() {
    let registry = ServiceRegistry::new();
    let err = registry
        .register_singleton(ServiceKey::of::<dyn Repository>(), memory_logger())
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_lazy_requires_singleton_scope() {
    let registry = ServiceRegistry::new();
    let err = registry
        .register(ServiceDescriptor::transient(memory_logger()).with_lazy(true))
        .unwrap_err();

    assert!(err.to_string().contains("lazy"));
}

#[test]
fn test_instance_requires_singleton_scope() {
    let registry = ServiceRegistry::new();
    let logger: Arc<dyn Logger> = Arc::new(MemoryLogger::default());
    let err = registry
        .register(ServiceDescriptor::instance(logger).with_scope(Scope::Request))
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_cleanup_hook_type_must_match_key() {
    let registry = ServiceRegistry::new();
    let err = registry
        .register(
            ServiceDescriptor::singleton(Implementation::of::<Connection>())
                .disposable::<BrokenConnection>(),
        )
        .unwrap_err();

    assert!(err.to_string().contains("cleanup"));
}

#[test]
fn test_qualified_keys_are_independent() {
    let registry = ServiceRegistry::new();
    let audit = ServiceKey::named::<dyn Logger>("audit");

    registry
        .register_singleton(logger_key(), memory_logger())
        .unwrap();
    registry.register_singleton(audit.clone(), memory_logger()).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.is_registered(&audit));
    assert_eq!(registry.keys(), vec![logger_key(), audit]);
}

#[test]
fn test_instance_binding_is_rekeyed() {
    let registry = ServiceRegistry::new();
    let audit = ServiceKey::named::<dyn Logger>("audit");
    registry.register_instance(audit.clone(), logger_instance()).unwrap();

    let descriptor = registry.get_descriptor(&audit).unwrap();
    match descriptor.binding() {
        Binding::Instance(instance) => assert_eq!(instance.key(), &audit),
        other => panic!("Expected instance binding, got {other:?}"),
    }
}

// ============================================================================
// Snapshots and contracts
// ============================================================================

#[test]
fn test_get_all_registrations_lists_constructor_bindings_only() {
    let registry = ServiceRegistry::new();
    registry
        .register_singleton(logger_key(), memory_logger())
        .unwrap();
    registry
        .register(ServiceDescriptor::factory::<dyn Repository, _>(|resolver| {
            let logger = wirebox_domain::ResolveExt::resolve::<dyn Logger>(resolver)?;
            let repository: Arc<dyn Repository> = Arc::new(StubRepository(logger));
            Ok(repository)
        }))
        .unwrap();

    let registrations = registry.get_all_registrations();
    assert_eq!(registrations.len(), 1);
    assert!(registrations.contains_key(&logger_key()));
    assert_eq!(registry.descriptors().len(), 2);
}

struct StubRepository(Arc<dyn Logger>);

impl Repository for StubRepository {
    fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.0)
    }

    fn dsn(&self) -> &str {
        "stub"
    }
}

#[test]
fn test_snapshot_is_not_a_live_view() {
    let registry = ServiceRegistry::new();
    registry
        .register_singleton(logger_key(), memory_logger())
        .unwrap();
    let snapshot = registry.get_all_registrations();

    registry
        .register_singleton(ServiceKey::of::<dyn Repository>(), sql_repository())
        .unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(registry.get_all_registrations().len(), 2);
}

#[test]
fn test_contract_applies_to_qualified_keys() {
    let registry = ServiceRegistry::new();
    registry
        .declare_contract(Contract::of::<dyn Logger>())
        .unwrap();

    let audit = ServiceKey::named::<dyn Logger>("audit");
    let contract = registry.contract_for(&audit).unwrap();
    assert_eq!(contract.required_members(), &["log", "lines"]);
    assert!(
        registry
            .contract_for(&ServiceKey::of::<dyn wirebox_domain::Disposable>())
            .is_none()
    );
}

// ============================================================================
// Singleton cache
// ============================================================================

#[test]
fn test_get_or_insert_singleton_keeps_first_instance() {
    let registry = ServiceRegistry::new();
    let first = logger_instance();
    let second = logger_instance();

    let stored = registry
        .get_or_insert_singleton(&logger_key(), first.clone())
        .unwrap();
    let again = registry
        .get_or_insert_singleton(&logger_key(), second.clone())
        .unwrap();

    assert!(stored.same_instance(&first));
    assert!(again.same_instance(&first));
    assert!(!again.same_instance(&second));
    assert_eq!(registry.singleton_count(), 1);
}

#[test]
fn test_drain_singletons_empties_cache() {
    let registry = ServiceRegistry::new();
    let cache_key = ServiceKey::of::<dyn crate::test_utils::Cache>();
    registry.register_singleton(cache_key.clone(), memory_cache()).unwrap();
    registry
        .set_singleton_instance(logger_key(), logger_instance())
        .unwrap();
    registry
        .set_singleton_instance(
            cache_key.clone(),
            ServiceInstance::new(cache_key.clone(), Arc::new(crate::test_utils::MemoryCache)),
        )
        .unwrap();

    let drained = registry.drain_singletons().unwrap();
    let keys: Vec<&ServiceKey> = drained.iter().map(ServiceInstance::key).collect();

    let logger = logger_key();
    let mut expected = vec![&cache_key, &logger];
    expected.sort();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys, expected);
    assert_eq!(registry.singleton_count(), 0);
    assert!(registry.is_registered(&cache_key));
}

#[test]
fn test_clear_all_resets_every_table() {
    let registry = ServiceRegistry::new();
    registry
        .register_singleton(logger_key(), memory_logger())
        .unwrap();
    registry
        .set_singleton_instance(logger_key(), logger_instance())
        .unwrap();
    registry
        .declare_contract(Contract::of::<dyn Logger>())
        .unwrap();

    registry.clear_all().unwrap();

    assert!(registry.is_empty());
    assert_eq!(registry.singleton_count(), 0);
    assert!(registry.contract_for(&logger_key()).is_none());
}
