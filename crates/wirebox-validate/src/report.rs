//! Validation Report Generation
//!
//! Generates reports in two formats:
//! - JSON for tooling
//! - Human-readable for terminal output

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use wirebox_domain::{Error, Result, ServiceKey};

/// Kind of problem a validation failure describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// The binding itself is malformed
    Configuration,
    /// The implementation misses capability members
    Contract,
    /// A required dependency has no registration
    UnresolvedDependency,
    /// Required dependencies form a cycle
    CircularDependency,
}

impl FailureCategory {
    /// Classify an error
    pub fn of(error: &Error) -> Self {
        match error {
            Error::ContractViolation { .. } => Self::Contract,
            Error::UnresolvedDependency { .. } => Self::UnresolvedDependency,
            Error::CircularDependency { .. } => Self::CircularDependency,
            _ => Self::Configuration,
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Contract => "contract",
            Self::UnresolvedDependency => "unresolved",
            Self::CircularDependency => "circular",
        };
        f.write_str(label)
    }
}

/// One problem found for one registration
#[derive(Debug, Serialize)]
pub struct ValidationFailure {
    /// Registration the failure is attributed to
    pub key: ServiceKey,
    /// Failure category
    pub category: FailureCategory,
    /// The underlying error
    #[serde(serialize_with = "serialize_error")]
    pub error: Error,
}

impl ValidationFailure {
    /// Attribute an error to a registration
    pub fn new(key: ServiceKey, error: Error) -> Self {
        Self {
            key,
            category: FailureCategory::of(&error),
            error,
        }
    }
}

fn serialize_error<S: Serializer>(error: &Error, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Summary of validation results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Implementation bindings in the registry
    pub total_registrations: usize,
    /// Bindings checked in this pass
    pub checked: usize,
    /// Bindings skipped because an earlier pass accepted them
    pub cached: usize,
    /// Total number of failures
    pub failure_count: usize,
    /// Number of configuration failures
    pub configuration_count: usize,
    /// Number of contract failures
    pub contract_count: usize,
    /// Number of unresolved dependencies
    pub unresolved_count: usize,
    /// Number of cycles
    pub circular_count: usize,
    /// Whether validation passed
    pub passed: bool,
}

/// Outcome of one aggregated validation pass
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// When the pass ran
    pub timestamp: DateTime<Utc>,
    /// Summary statistics
    pub summary: ValidationSummary,
    /// Every failure, in discovery order
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    /// Build a report and its summary
    pub fn new(
        total_registrations: usize,
        checked: usize,
        cached: usize,
        failures: Vec<ValidationFailure>,
    ) -> Self {
        let count = |category: FailureCategory| {
            failures
                .iter()
                .filter(|failure| failure.category == category)
                .count()
        };
        let summary = ValidationSummary {
            total_registrations,
            checked,
            cached,
            failure_count: failures.len(),
            configuration_count: count(FailureCategory::Configuration),
            contract_count: count(FailureCategory::Contract),
            unresolved_count: count(FailureCategory::UnresolvedDependency),
            circular_count: count(FailureCategory::CircularDependency),
            passed: failures.is_empty(),
        };
        Self {
            timestamp: Utc::now(),
            summary,
            failures,
        }
    }

    /// Whether no failure was found
    pub fn passed(&self) -> bool {
        self.summary.passed
    }

    /// Failures attributed to one key
    pub fn failures_for<'a>(
        &'a self,
        key: &'a ServiceKey,
    ) -> impl Iterator<Item = &'a ValidationFailure> + 'a {
        self.failures.iter().filter(move |failure| &failure.key == key)
    }

    /// Failures of one category
    pub fn failures_of(&self, category: FailureCategory) -> impl Iterator<Item = &ValidationFailure> {
        self.failures
            .iter()
            .filter(move |failure| failure.category == category)
    }

    /// `Ok(self)` when the pass found nothing, otherwise one aggregate error
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            return Ok(self);
        }
        Err(Error::ValidationFailed {
            failures: self.failures.into_iter().map(|failure| failure.error).collect(),
        })
    }
}

/// Report generator
pub struct Reporter;

impl Reporter {
    /// Generate JSON report
    pub fn to_json(report: &ValidationReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Generate human-readable report
    pub fn to_human_readable(report: &ValidationReport) -> String {
        let mut output = String::new();

        output.push_str("=== Registration Validation Report ===\n\n");
        output.push_str(&format!("Timestamp: {}\n\n", report.timestamp.to_rfc3339()));

        // Summary
        output.push_str("--- Summary ---\n");
        output.push_str(&format!(
            "  Registrations:  {}\n",
            report.summary.total_registrations
        ));
        output.push_str(&format!("  Checked:        {}\n", report.summary.checked));
        output.push_str(&format!("  Cached:         {}\n", report.summary.cached));
        output.push_str(&format!(
            "  Configuration:  {}\n",
            report.summary.configuration_count
        ));
        output.push_str(&format!("  Contract:       {}\n", report.summary.contract_count));
        output.push_str(&format!(
            "  Unresolved:     {}\n",
            report.summary.unresolved_count
        ));
        output.push_str(&format!("  Circular:       {}\n", report.summary.circular_count));
        output.push('\n');

        let status = if report.summary.passed {
            "PASSED"
        } else {
            "FAILED"
        };
        output.push_str(&format!("Status: {status}\n\n"));

        if !report.failures.is_empty() {
            output.push_str("--- Failures ---\n");
            for failure in &report.failures {
                output.push_str(&format!(
                    "  [{}] {}: {}\n",
                    failure.category, failure.key, failure.error
                ));
            }
            output.push('\n');
        }

        output
    }
}
