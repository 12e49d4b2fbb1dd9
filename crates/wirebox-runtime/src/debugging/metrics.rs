//! Resolution performance metrics

use serde::Serialize;
use std::collections::BTreeMap;
use wirebox_domain::{ResolutionRecord, ServiceKey};

/// Counts and latencies for one key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyMetrics {
    /// Resolve calls recorded
    pub resolutions: u64,
    /// Calls that failed
    pub failures: u64,
    /// Sum of all latencies, in microseconds
    pub total_micros: u64,
    /// Slowest call, in microseconds
    pub max_micros: u64,
}

impl KeyMetrics {
    /// Mean latency in microseconds
    #[allow(clippy::cast_precision_loss)]
    pub fn average_micros(&self) -> f64 {
        if self.resolutions == 0 {
            0.0
        } else {
            self.total_micros as f64 / self.resolutions as f64
        }
    }

    fn add(&mut self, record: &ResolutionRecord) {
        self.resolutions += 1;
        if !record.success {
            self.failures += 1;
        }
        self.total_micros = self.total_micros.saturating_add(record.duration_micros);
        self.max_micros = self.max_micros.max(record.duration_micros);
    }
}

/// Aggregated view of the resolution history
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Resolve calls recorded
    pub total_resolutions: u64,
    /// Calls that failed
    pub failed_resolutions: u64,
    /// Mean latency over all calls, in microseconds
    pub average_micros: f64,
    /// Slowest call, in microseconds
    pub max_micros: u64,
    /// Breakdown per key
    pub per_key: BTreeMap<ServiceKey, KeyMetrics>,
}

impl PerformanceMetrics {
    /// Aggregate a list of records
    pub fn from_records(records: &[ResolutionRecord]) -> Self {
        let mut totals = KeyMetrics::default();
        let mut per_key: BTreeMap<ServiceKey, KeyMetrics> = BTreeMap::new();

        for record in records {
            totals.add(record);
            per_key.entry(record.key.clone()).or_default().add(record);
        }

        Self {
            total_resolutions: totals.resolutions,
            failed_resolutions: totals.failures,
            average_micros: totals.average_micros(),
            max_micros: totals.max_micros,
            per_key,
        }
    }

    /// Share of calls that succeeded; 1.0 when nothing was recorded
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_resolutions == 0 {
            1.0
        } else {
            (self.total_resolutions - self.failed_resolutions) as f64
                / self.total_resolutions as f64
        }
    }

    /// The `n` keys with the highest mean latency, slowest first
    pub fn slowest(&self, n: usize) -> Vec<(&ServiceKey, &KeyMetrics)> {
        let mut keys: Vec<(&ServiceKey, &KeyMetrics)> = self.per_key.iter().collect();
        keys.sort_by(|a, b| b.1.average_micros().total_cmp(&a.1.average_micros()));
        keys.truncate(n);
        keys
    }
}
