//! Debugging Tools Tests

use crate::test_utils::{
    Cache, Logger, Repository, RequestHandler, memory_logger, sql_repository,
};
use wirebox_domain::{BindingKind, Implementation, ResolutionRecord, Scope, ServiceKey};
use wirebox_runtime::config::DebuggingConfig;
use wirebox_runtime::debugging::{DebuggingTools, PerformanceMetrics};
use wirebox_runtime::{LifecycleManager, ServiceRegistry};

fn tools_with_limit(history_limit: usize) -> DebuggingTools {
    DebuggingTools::new(&DebuggingConfig {
        history_limit,
        ..DebuggingConfig::default()
    })
}

fn registry() -> ServiceRegistry {
    let registry = ServiceRegistry::new();
    registry
        .register_singleton(ServiceKey::of::<dyn Logger>(), memory_logger())
        .unwrap();
    registry
        .register_singleton(ServiceKey::of::<dyn Repository>(), sql_repository())
        .unwrap();
    registry
        .register_transient(
            ServiceKey::of::<RequestHandler>(),
            Implementation::of::<RequestHandler>(),
        )
        .unwrap();
    registry
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_history_is_bounded() {
    let tools = tools_with_limit(3);
    let key = ServiceKey::of::<dyn Logger>();

    for micros in 0..5 {
        tools.record_resolution(&key, micros, None);
    }

    let history = tools.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].duration_micros, 2);
    assert_eq!(history[2].duration_micros, 4);
}

#[test]
fn test_recent_failures_newest_first() {
    let tools = tools_with_limit(10);
    let logger = ServiceKey::of::<dyn Logger>();
    let repository = ServiceKey::of::<dyn Repository>();

    tools.record(ResolutionRecord::failure(logger.clone(), 1, "first"));
    tools.record(ResolutionRecord::success(logger, 2));
    tools.record(ResolutionRecord::failure(repository.clone(), 3, "second"));

    let failures = tools.recent_failures(5);
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].key, repository);
    assert_eq!(failures[0].error.as_deref(), Some("second"));
    assert_eq!(tools.recent_failures(1).len(), 1);
}

#[test]
fn test_failed_resolution_keeps_error_text() {
    let tools = tools_with_limit(10);
    let key = ServiceKey::of::<dyn Repository>();

    tools.record_resolution(&key, 7, Some("no binding for dyn Repository"));

    let failures = tools.recent_failures(1);
    assert_eq!(failures.len(), 1);
    assert!(!failures[0].success);
    assert_eq!(failures[0].duration_micros, 7);
    assert_eq!(
        failures[0].error.as_deref(),
        Some("no binding for dyn Repository")
    );
}

#[test]
fn test_clear_history() {
    let tools = tools_with_limit(10);
    tools.record_resolution(&ServiceKey::of::<dyn Logger>(), 1, None);
    tools.clear_history();
    assert_eq!(tools.history_len(), 0);
}

// ============================================================================
// Metrics
// ============================================================================

#[test]
fn test_performance_metrics_aggregate_per_key() {
    let tools = tools_with_limit(10);
    let logger = ServiceKey::of::<dyn Logger>();
    let repository = ServiceKey::of::<dyn Repository>();

    tools.record_resolution(&logger, 10, None);
    tools.record_resolution(&logger, 30, None);
    tools.record_resolution(&repository, 100, Some("no binding"));

    let metrics = tools.get_performance_metrics();
    assert_eq!(metrics.total_resolutions, 3);
    assert_eq!(metrics.failed_resolutions, 1);
    assert_eq!(metrics.max_micros, 100);

    let logger_metrics = &metrics.per_key[&logger];
    assert_eq!(logger_metrics.resolutions, 2);
    assert_eq!(logger_metrics.total_micros, 40);
    assert!((logger_metrics.average_micros() - 20.0).abs() < f64::EPSILON);

    let slowest = metrics.slowest(1);
    assert_eq!(slowest[0].0, &repository);
    assert!((metrics.success_rate() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_empty_metrics() {
    let metrics = PerformanceMetrics::from_records(&[]);
    assert_eq!(metrics.total_resolutions, 0);
    assert!((metrics.success_rate() - 1.0).abs() < f64::EPSILON);
    assert!(metrics.slowest(3).is_empty());
}

// ============================================================================
// Dependency graph
// ============================================================================

#[test]
fn test_dependency_graph_nodes_and_edges() {
    let tools = DebuggingTools::default();
    let graph = tools.get_dependency_graph(&registry());

    assert_eq!(graph.nodes.len(), 3);
    let handler = graph
        .nodes
        .iter()
        .find(|node| node.key == ServiceKey::of::<RequestHandler>())
        .unwrap();
    assert_eq!(handler.scope, Scope::Transient);
    assert_eq!(handler.binding, BindingKind::Implementation);
    assert!(!handler.cached);

    let handler_key = ServiceKey::of::<RequestHandler>();
    let targets: Vec<&ServiceKey> = graph.dependencies_of(&handler_key).map(|e| &e.to).collect();
    assert_eq!(
        targets,
        vec![&ServiceKey::of::<dyn Repository>(), &ServiceKey::of::<dyn Cache>()]
    );

    let logger_key = ServiceKey::of::<dyn Logger>();
    assert_eq!(graph.dependents_of(&logger_key).count(), 1);
    assert_eq!(graph.missing(), vec![&ServiceKey::of::<dyn Cache>()]);
}

#[test]
fn test_dependency_graph_dot_rendering() {
    let graph = DebuggingTools::default().get_dependency_graph(&registry());
    let dot = graph.to_dot();

    assert!(dot.starts_with("digraph wirebox {"));
    assert!(dot.contains("\"RequestHandler\" -> \"dyn Repository\" [label=\"repository\"];"));
    assert!(dot.contains("\"RequestHandler\" -> \"dyn Cache\" [label=\"cache\", style=dashed];"));
    assert!(dot.contains("\"dyn Cache\" [color=red, style=dashed];"));
    assert!(dot.trim_end().ends_with('}'));
}

#[test]
fn test_dependency_graph_json() {
    let graph = DebuggingTools::default().get_dependency_graph(&registry());
    let json: serde_json::Value = serde_json::from_str(&graph.to_json()).unwrap();

    assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(json["edges"].as_array().unwrap().len(), 3);
}

// ============================================================================
// Diagnostic report
// ============================================================================

#[test]
fn test_diagnostic_report_sections() {
    let tools = tools_with_limit(10);
    let lifecycle = LifecycleManager::new();
    lifecycle.create_scope("request-1");
    tools.record(ResolutionRecord::failure(
        ServiceKey::of::<dyn Cache>(),
        5,
        "Service dyn Cache is not registered",
    ));

    let report = tools.generate_diagnostic_report(&registry(), &lifecycle);
    let text = report.to_string();

    assert!(text.contains("=== Container Diagnostic Report ==="));
    assert!(text.contains("--- Registrations (3) ---"));
    assert!(text.contains("--- Open Scopes (1) ---"));
    assert!(text.contains("request-1: 0 instance(s)"));
    assert!(text.contains("--- Recent Failures (1) ---"));
    assert!(text.contains("dyn Cache: Service dyn Cache is not registered"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["metrics"]["failed_resolutions"], 1);
}
