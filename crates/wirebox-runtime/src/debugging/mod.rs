//! Debugging tools
//!
//! Purely observational: resolution history, latency metrics, the
//! dependency graph and a diagnostic report. Nothing here affects how
//! services resolve.

pub mod graph;
pub mod metrics;
pub mod report;

pub use graph::{DependencyGraph, GraphNode};
pub use metrics::{KeyMetrics, PerformanceMetrics};
pub use report::DiagnosticReport;

use crate::config::DebuggingConfig;
use crate::lifecycle::LifecycleManager;
use crate::registry::ServiceRegistry;
use crate::utils::recover_poisoned;
use std::collections::VecDeque;
use std::sync::Mutex;
use wirebox_domain::{ResolutionRecord, ServiceKey};

/// Bounded resolution history plus graph and report rendering
#[derive(Debug)]
pub struct DebuggingTools {
    history: Mutex<VecDeque<ResolutionRecord>>,
    limit: usize,
    recent_failures: usize,
}

impl Default for DebuggingTools {
    fn default() -> Self {
        Self::new(&DebuggingConfig::default())
    }
}

impl DebuggingTools {
    /// Create tools with the configured history bound
    pub fn new(config: &DebuggingConfig) -> Self {
        let limit = config.history_limit.max(1);
        Self {
            history: Mutex::new(VecDeque::with_capacity(limit.min(64))),
            limit,
            recent_failures: config.report_recent_failures,
        }
    }

    /// Append a record, dropping the oldest beyond the bound
    pub fn record(&self, record: ResolutionRecord) {
        let mut history = recover_poisoned(self.history.lock(), "resolution history");
        while history.len() >= self.limit {
            history.pop_front();
        }
        history.push_back(record);
    }

    /// Append the outcome of one resolve call
    ///
    /// `error` carries the failure message; `None` records a success.
    pub fn record_resolution(&self, key: &ServiceKey, duration_micros: u64, error: Option<&str>) {
        let record = match error {
            None => ResolutionRecord::success(key.clone(), duration_micros),
            Some(message) => ResolutionRecord::failure(key.clone(), duration_micros, message),
        };
        self.record(record);
    }

    /// Snapshot of the history, oldest first
    pub fn history(&self) -> Vec<ResolutionRecord> {
        recover_poisoned(self.history.lock(), "resolution history")
            .iter()
            .cloned()
            .collect()
    }

    /// Most recent failures, newest first
    pub fn recent_failures(&self, limit: usize) -> Vec<ResolutionRecord> {
        recover_poisoned(self.history.lock(), "resolution history")
            .iter()
            .rev()
            .filter(|record| !record.success)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of records held
    pub fn history_len(&self) -> usize {
        recover_poisoned(self.history.lock(), "resolution history").len()
    }

    /// Drop every record
    pub fn clear_history(&self) {
        recover_poisoned(self.history.lock(), "resolution history").clear();
    }

    /// Aggregate the history into per-key counts and latencies
    pub fn get_performance_metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics::from_records(&self.history())
    }

    /// Constructor-derived dependency graph of the registry
    pub fn get_dependency_graph(&self, registry: &ServiceRegistry) -> DependencyGraph {
        DependencyGraph::from_registry(registry)
    }

    /// Registrations, open scopes, metrics and recent failures in one report
    pub fn generate_diagnostic_report(
        &self,
        registry: &ServiceRegistry,
        lifecycle: &LifecycleManager,
    ) -> DiagnosticReport {
        DiagnosticReport {
            generated_at: chrono::Utc::now(),
            registrations: DependencyGraph::from_registry(registry).nodes,
            open_scopes: lifecycle.scope_summaries(),
            metrics: self.get_performance_metrics(),
            recent_failures: self.recent_failures(self.recent_failures),
        }
    }
}
