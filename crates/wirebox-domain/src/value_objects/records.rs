//! Resolution history and dependency graph value objects

use super::ServiceKey;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Outcome of one resolve call, kept by the debugging tools
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionRecord {
    /// The resolved key
    pub key: ServiceKey,
    /// Wall time spent, in microseconds
    pub duration_micros: u64,
    /// Whether an instance was produced
    pub success: bool,
    /// Error message for failed resolutions
    pub error: Option<String>,
    /// When the resolution finished
    pub recorded_at: DateTime<Utc>,
}

impl ResolutionRecord {
    /// Record a successful resolution
    pub fn success(key: ServiceKey, duration_micros: u64) -> Self {
        Self {
            key,
            duration_micros,
            success: true,
            error: None,
            recorded_at: Utc::now(),
        }
    }

    /// Record a failed resolution
    pub fn failure(key: ServiceKey, duration_micros: u64, error: impl Into<String>) -> Self {
        Self {
            key,
            duration_micros,
            success: false,
            error: Some(error.into()),
            recorded_at: Utc::now(),
        }
    }
}

/// Constructor-derived dependency between two keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    /// The service whose constructor declares the parameter
    pub from: ServiceKey,
    /// The key the parameter requests
    pub to: ServiceKey,
    /// Parameter name
    pub parameter: &'static str,
    /// False when the parameter carries a default
    pub required: bool,
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.parameter)?;
        if !self.required {
            write!(f, " [optional]")?;
        }
        Ok(())
    }
}
