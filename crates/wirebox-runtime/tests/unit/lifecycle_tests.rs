//! Lifecycle Manager Tests

use crate::test_utils::{Logger, MemoryLogger};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wirebox_domain::{CleanupHook, Error, Result, ScopeId, ServiceInstance, ServiceKey};
use wirebox_runtime::LifecycleManager;

struct Alpha;
struct Beta;
struct Gamma;

fn instance<T: Send + Sync + 'static>(value: T) -> ServiceInstance {
    ServiceInstance::new(ServiceKey::of::<T>(), Arc::new(value))
}

fn counting_hook(counter: &Arc<AtomicUsize>) -> CleanupHook {
    let counter = Arc::clone(counter);
    Arc::new(move |_instance: &ServiceInstance| -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

fn failing_hook() -> CleanupHook {
    Arc::new(|_instance: &ServiceInstance| -> Result<()> {
        Err(Error::internal("hook failed"))
    })
}

fn panicking_hook() -> CleanupHook {
    Arc::new(|_instance: &ServiceInstance| -> Result<()> { panic!("hook exploded") })
}

// ============================================================================
// Scopes
// ============================================================================

#[test]
fn test_create_scope_is_idempotent() {
    let lifecycle = LifecycleManager::new();

    assert!(lifecycle.create_scope("request-1"));
    assert!(!lifecycle.create_scope("request-1"));
    assert!(lifecycle.has_scope(&ScopeId::new("request-1")));
    assert_eq!(lifecycle.open_scopes(), vec![ScopeId::new("request-1")]);
}

#[test]
fn test_dispose_unknown_scope_is_noop() {
    let lifecycle = LifecycleManager::new();

    let report = lifecycle.dispose_scope(&ScopeId::new("never-created"));

    assert_eq!(report.scope_id, Some(ScopeId::new("never-created")));
    assert_eq!(report.instances, 0);
    assert!(report.is_clean());
}

#[test]
fn test_dispose_twice_runs_hooks_once() {
    let lifecycle = LifecycleManager::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let id = ScopeId::new("request-2");
    lifecycle.create_scope(&id);
    lifecycle
        .store_scoped(&id, instance(Alpha).with_cleanup(counting_hook(&counter)))
        .unwrap();

    let first = lifecycle.dispose_scope(&id);
    let second = lifecycle.dispose_scope(&id);

    assert_eq!(first.instances, 1);
    assert_eq!(first.cleaned, 1);
    assert_eq!(second.instances, 0);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(!lifecycle.has_scope(&id));
}

#[test]
fn test_store_into_unknown_scope_fails() {
    let lifecycle = LifecycleManager::new();

    let err = lifecycle
        .store_scoped(&ScopeId::new("missing"), instance(Alpha))
        .unwrap_err();

    assert!(matches!(err, Error::ScopeNotFound { ref scope_id } if scope_id == "missing"));
}

#[test]
fn test_store_scoped_keeps_first_instance() {
    let lifecycle = LifecycleManager::new();
    let id = ScopeId::new("request-3");
    lifecycle.create_scope(&id);
    let first = instance(Alpha);
    let second = instance(Alpha);

    lifecycle.store_scoped(&id, first.clone()).unwrap();
    let stored = lifecycle.store_scoped(&id, second).unwrap();

    assert!(stored.same_instance(&first));
    let cached = lifecycle.get_scoped(&id, &ServiceKey::of::<Alpha>()).unwrap();
    assert!(cached.same_instance(&first));
    assert!(lifecycle.get_scoped(&id, &ServiceKey::of::<Beta>()).is_none());
}

// ============================================================================
// Cleanup
// ============================================================================

#[test]
fn test_failing_hook_does_not_block_others() {
    let lifecycle = LifecycleManager::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let id = ScopeId::new("request-4");
    lifecycle.create_scope(&id);
    lifecycle
        .store_scoped(&id, instance(Alpha).with_cleanup(counting_hook(&counter)))
        .unwrap();
    lifecycle
        .store_scoped(&id, instance(Beta).with_cleanup(failing_hook()))
        .unwrap();
    lifecycle
        .store_scoped(&id, instance(Gamma).with_cleanup(counting_hook(&counter)))
        .unwrap();

    let report = lifecycle.dispose_scope(&id);

    assert_eq!(report.instances, 3);
    assert_eq!(report.cleaned, 2);
    assert_eq!(report.failed, 1);
    assert!(!report.is_clean());
    assert!(report.errors[0].contains("hook failed"));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_panicking_hook_is_contained() {
    let lifecycle = LifecycleManager::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let id = ScopeId::new("request-5");
    lifecycle.create_scope(&id);
    lifecycle
        .store_scoped(&id, instance(Alpha).with_cleanup(panicking_hook()))
        .unwrap();
    lifecycle
        .store_scoped(&id, instance(Beta).with_cleanup(counting_hook(&counter)))
        .unwrap();

    let report = lifecycle.dispose_scope(&id);

    assert_eq!(report.failed, 1);
    assert_eq!(report.cleaned, 1);
    assert!(report.errors[0].contains("hook exploded"));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_instances_without_hooks_are_released() {
    let lifecycle = LifecycleManager::new();
    let id = ScopeId::new("request-6");
    lifecycle.create_scope(&id);
    lifecycle.store_scoped(&id, instance(Alpha)).unwrap();

    let report = lifecycle.dispose_scope(&id);

    assert_eq!(report.instances, 1);
    assert_eq!(report.cleaned, 0);
    assert!(report.is_clean());
}

#[test]
fn test_cleanup_all_disposes_scopes_then_singletons() {
    let lifecycle = LifecycleManager::new();
    let counter = Arc::new(AtomicUsize::new(0));
    for id in ["a", "b"] {
        lifecycle.create_scope(id);
        lifecycle
            .store_scoped(
                &ScopeId::new(id),
                instance(Alpha).with_cleanup(counting_hook(&counter)),
            )
            .unwrap();
    }
    let singleton = instance(Beta).with_cleanup(counting_hook(&counter));

    let reports = lifecycle.cleanup_all(std::slice::from_ref(&singleton));

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].scope_id, Some(ScopeId::new("a")));
    assert_eq!(reports[1].scope_id, Some(ScopeId::new("b")));
    assert_eq!(reports[2].scope_id, None);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert!(lifecycle.open_scopes().is_empty());
    assert!(singleton.is_disposed());
}

#[test]
fn test_cleanup_runs_at_most_once_per_instance() {
    let lifecycle = LifecycleManager::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let shared = instance(Alpha).with_cleanup(counting_hook(&counter));

    let first = lifecycle.cleanup_instances(&[shared.clone()]);
    let second = lifecycle.cleanup_instances(&[shared]);

    assert_eq!(first.cleaned, 1);
    assert_eq!(second.cleaned, 0);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_create_with_lifecycle_attaches_missing_hook_only() {
    let lifecycle = LifecycleManager::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let hook = counting_hook(&counter);

    let fresh = lifecycle.create_with_lifecycle(instance(Alpha), Some(&hook));
    assert!(fresh.has_cleanup());

    let logger: Arc<dyn Logger> = Arc::new(MemoryLogger::default());
    let plain = ServiceInstance::new(ServiceKey::of::<dyn Logger>(), logger);
    let untouched = lifecycle.create_with_lifecycle(plain.clone(), None);
    assert!(!untouched.has_cleanup());
    assert!(untouched.same_instance(&plain));

    let already = instance(Beta).with_cleanup(failing_hook());
    let kept = lifecycle.create_with_lifecycle(already, Some(&hook));
    assert!(kept.run_cleanup().unwrap().is_err());
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_scope_summaries_report_sizes() {
    let lifecycle = LifecycleManager::new();
    lifecycle.create_scope("session-1");
    lifecycle.create_scope("request-7");
    lifecycle
        .store_scoped(&ScopeId::new("session-1"), instance(Alpha))
        .unwrap();

    let summaries = lifecycle.scope_summaries();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].scope_id, ScopeId::new("request-7"));
    assert_eq!(summaries[0].instances, 0);
    assert_eq!(summaries[1].instances, 1);
}
