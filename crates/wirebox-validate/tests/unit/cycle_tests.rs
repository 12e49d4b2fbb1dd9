//! Unit tests for static cycle detection

use crate::fixtures::{Branch, CycleA, CycleB, FakeRegistry, Leaf, SelfLoop, cyclic_registry};
use std::time::{Duration, Instant};
use wirebox_domain::{Constructor, Error, Implementation, Parameter, ServiceKey};
use wirebox_validate::{analyze_cycles, detect_circular_dependencies, find_cycles};

fn cycle_of(error: Error) -> Vec<ServiceKey> {
    match error {
        Error::CircularDependency { path } => path,
        other => panic!("expected circular dependency, got {other:?}"),
    }
}

/// Qualified `Leaf` binding whose constructor depends on the given qualifiers
fn linked(registry: FakeRegistry, qualifier: &str, targets: &[&str]) -> FakeRegistry {
    let constructor = targets.iter().fold(Constructor::new(), |constructor, target| {
        constructor.param(Parameter::named_service::<Leaf>("next", *target))
    });
    registry.with(
        ServiceKey::named::<Leaf>(qualifier),
        Implementation::of::<Leaf>().with_constructor(constructor),
    )
}

/// `d0 -> (l0, r0) -> d1 -> ... -> d{count}`, with no cycle anywhere
fn diamond_chain(count: usize) -> FakeRegistry {
    let mut registry = FakeRegistry::new();
    for index in 0..count {
        let (top, left, right, bottom) = (
            format!("d{index}"),
            format!("l{index}"),
            format!("r{index}"),
            format!("d{}", index + 1),
        );
        registry = linked(registry, &top, &[left.as_str(), right.as_str()]);
        registry = linked(registry, &left, &[bottom.as_str()]);
        registry = linked(registry, &right, &[bottom.as_str()]);
    }
    linked(registry, &format!("d{count}"), &[])
}

#[test]
fn test_mutual_cycle_path_starts_at_requested_key() {
    let registry = cyclic_registry();

    let from_a = detect_circular_dependencies(&ServiceKey::of::<CycleA>(), &registry)
        .expect_err("A -> B -> A");
    assert_eq!(
        cycle_of(from_a),
        vec![
            ServiceKey::of::<CycleA>(),
            ServiceKey::of::<CycleB>(),
            ServiceKey::of::<CycleA>()
        ]
    );

    let from_b = detect_circular_dependencies(&ServiceKey::of::<CycleB>(), &registry)
        .expect_err("B -> A -> B");
    assert_eq!(cycle_of(from_b)[0], ServiceKey::of::<CycleB>());
}

#[test]
fn test_self_loop_is_detected() {
    let registry = cyclic_registry();
    let error = detect_circular_dependencies(&ServiceKey::of::<SelfLoop>(), &registry)
        .expect_err("self loop");
    assert_eq!(
        cycle_of(error),
        vec![ServiceKey::of::<SelfLoop>(), ServiceKey::of::<SelfLoop>()]
    );
}

#[test]
fn test_acyclic_graph_with_shared_dependency_passes() {
    let registry = FakeRegistry::new()
        .with(ServiceKey::of::<Branch>(), Implementation::of::<Branch>())
        .with(ServiceKey::of::<Leaf>(), Implementation::of::<Leaf>());

    detect_circular_dependencies(&ServiceKey::of::<Branch>(), &registry).expect("no cycle");
    assert!(find_cycles(&registry).is_empty());
}

#[test]
fn test_unregistered_start_has_no_cycle() {
    let registry = FakeRegistry::new();
    detect_circular_dependencies(&ServiceKey::of::<CycleA>(), &registry)
        .expect("nothing registered, nothing to walk");
}

#[test]
fn test_find_cycles_reports_each_cycle_once() {
    let cycles = find_cycles(&cyclic_registry());
    assert_eq!(cycles.len(), 2);
    assert!(cycles.contains(&vec![
        ServiceKey::of::<CycleA>(),
        ServiceKey::of::<CycleB>(),
        ServiceKey::of::<CycleA>()
    ]));
    assert!(cycles.contains(&vec![
        ServiceKey::of::<SelfLoop>(),
        ServiceKey::of::<SelfLoop>()
    ]));
}

// ============================================================================
// Shared dependencies and larger components
// ============================================================================

#[test]
fn test_long_diamond_chain_is_acyclic_and_fast() {
    let registry = diamond_chain(30);

    let started = Instant::now();
    assert!(find_cycles(&registry).is_empty());
    detect_circular_dependencies(&ServiceKey::named::<Leaf>("d0"), &registry)
        .expect("diamonds share dependencies without looping");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_component_with_chords_reports_one_cycle() {
    let registry = FakeRegistry::new();
    let registry = linked(registry, "a", &["b"]);
    let registry = linked(registry, "b", &["a", "c"]);
    let registry = linked(registry, "c", &["a"]);
    let registry = linked(registry, "tail", &["a"]);

    let analysis = analyze_cycles(&registry);
    assert_eq!(analysis.components.len(), 1);
    assert_eq!(
        analysis.components[0],
        vec![
            ServiceKey::named::<Leaf>("a"),
            ServiceKey::named::<Leaf>("b"),
            ServiceKey::named::<Leaf>("c"),
        ]
    );
    assert_eq!(
        analysis.cycles,
        vec![vec![
            ServiceKey::named::<Leaf>("a"),
            ServiceKey::named::<Leaf>("b"),
            ServiceKey::named::<Leaf>("a"),
        ]]
    );
    assert!(!analysis.is_acyclic());
}

#[test]
fn test_cycle_behind_diamonds_is_found() {
    let registry = linked(diamond_chain(10), "d10", &["d0"]);
    let cycles = find_cycles(&registry);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].first(), cycles[0].last());
    assert_eq!(cycles[0].len(), 22);
}
