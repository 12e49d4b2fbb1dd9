//! Diagnostic report

use super::graph::GraphNode;
use super::metrics::PerformanceMetrics;
use crate::constants::REPORT_SLOWEST_KEYS;
use crate::lifecycle::ScopeSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use wirebox_domain::ResolutionRecord;

/// Human-readable summary of container state
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Every registration, sorted by key
    pub registrations: Vec<GraphNode>,
    /// Open request/session scopes
    pub open_scopes: Vec<ScopeSummary>,
    /// Resolution metrics
    pub metrics: PerformanceMetrics,
    /// Most recent failures, newest first
    pub recent_failures: Vec<ResolutionRecord>,
}

impl DiagnosticReport {
    /// Pretty JSON rendering
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Container Diagnostic Report ===")?;
        writeln!(f)?;
        writeln!(f, "Generated: {}", self.generated_at.to_rfc3339())?;
        writeln!(f)?;

        writeln!(f, "--- Registrations ({}) ---", self.registrations.len())?;
        for node in &self.registrations {
            write!(f, "  {} [{} {}]", node.key, node.scope, node.binding)?;
            if node.lazy {
                write!(f, " lazy")?;
            }
            if node.cached {
                write!(f, " cached")?;
            }
            if let Some(implementation) = &node.implementation {
                write!(f, " -> {implementation}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        writeln!(f, "--- Open Scopes ({}) ---", self.open_scopes.len())?;
        for scope in &self.open_scopes {
            writeln!(f, "  {}: {} instance(s)", scope.scope_id, scope.instances)?;
        }
        writeln!(f)?;

        writeln!(f, "--- Resolutions ---")?;
        writeln!(f, "  Total:    {}", self.metrics.total_resolutions)?;
        writeln!(f, "  Failed:   {}", self.metrics.failed_resolutions)?;
        writeln!(f, "  Average:  {:.1}us", self.metrics.average_micros)?;
        writeln!(f, "  Max:      {}us", self.metrics.max_micros)?;
        for (key, metrics) in self.metrics.slowest(REPORT_SLOWEST_KEYS) {
            writeln!(
                f,
                "  {key}: {} call(s), avg {:.1}us",
                metrics.resolutions,
                metrics.average_micros()
            )?;
        }
        writeln!(f)?;

        writeln!(f, "--- Recent Failures ({}) ---", self.recent_failures.len())?;
        for record in &self.recent_failures {
            writeln!(
                f,
                "  {} {}: {}",
                record.recorded_at.to_rfc3339(),
                record.key,
                record.error.as_deref().unwrap_or("unknown error")
            )?;
        }
        Ok(())
    }
}
