//! Validation engine

use crate::chain::{unresolved_dependencies, validate_dependency_chain};
use crate::contracts::{validate_protocol_implementation, validate_registration};
use crate::cycles::{analyze_cycles, detect_circular_dependencies};
use crate::report::{ValidationFailure, ValidationReport};
use dashmap::DashSet;
use std::collections::HashSet;
use tracing::{debug, warn};
use wirebox_domain::{Error, Implementation, RegistryView, Result, ServiceKey};

/// Static checks over a registry, with a cache of accepted keys
///
/// The cache only records keys that passed every check. Callers must clear
/// it whenever registrations change.
#[derive(Debug, Default)]
pub struct ValidationEngine {
    validated: DashSet<ServiceKey>,
}

impl ValidationEngine {
    /// Create an engine with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructibility and contract check for one binding
    pub fn validate_registration(
        &self,
        key: &ServiceKey,
        implementation: &Implementation,
        registry: &dyn RegistryView,
    ) -> Result<()> {
        validate_registration(key, implementation, registry)
    }

    /// Contract check against the contract declared for `capability`
    ///
    /// Succeeds trivially when no contract is declared.
    pub fn validate_protocol_implementation(
        &self,
        capability: &ServiceKey,
        implementation: &Implementation,
        registry: &dyn RegistryView,
    ) -> Result<()> {
        match registry.contract_for(capability) {
            Some(contract) => validate_protocol_implementation(&contract, implementation),
            None => Ok(()),
        }
    }

    /// Required-dependency check for one binding
    pub fn validate_dependency_chain(
        &self,
        key: &ServiceKey,
        implementation: &Implementation,
        registry: &dyn RegistryView,
    ) -> Result<()> {
        validate_dependency_chain(key, implementation, registry)
    }

    /// Cycle check starting from one key
    pub fn detect_circular_dependencies(
        &self,
        start: &ServiceKey,
        registry: &dyn RegistryView,
    ) -> Result<()> {
        detect_circular_dependencies(start, registry)
    }

    /// Check every implementation binding and aggregate all failures
    ///
    /// Never stops at the first problem.
    pub fn validate_all_registrations(&self, registry: &dyn RegistryView) -> ValidationReport {
        let registrations = registry.get_all_registrations();
        let analysis = analyze_cycles(registry);
        let in_cycle: HashSet<&ServiceKey> = analysis.components.iter().flatten().collect();

        let mut failures = Vec::new();
        let mut checked = 0;
        let mut cached = 0;

        for (key, implementation) in &registrations {
            if self.validated.contains(key) {
                cached += 1;
                continue;
            }
            checked += 1;

            let mut found: Vec<Error> = Vec::new();
            if let Err(error) = validate_registration(key, implementation, registry) {
                found.push(error);
            }
            found.extend(unresolved_dependencies(key, implementation, registry));

            if found.is_empty() && !in_cycle.contains(key) {
                self.validated.insert(key.clone());
            }
            failures.extend(
                found
                    .into_iter()
                    .map(|error| ValidationFailure::new(key.clone(), error)),
            );
        }

        for cycle in &analysis.cycles {
            if let Some(first) = cycle.first() {
                failures.push(ValidationFailure::new(
                    first.clone(),
                    Error::circular(cycle.clone()),
                ));
            }
        }

        let report = ValidationReport::new(registrations.len(), checked, cached, failures);
        if report.passed() {
            debug!(checked, cached, "Validation pass succeeded");
        } else {
            warn!(
                checked,
                cached,
                failures = report.summary.failure_count,
                "Validation pass found problems"
            );
        }
        report
    }

    /// Whether a key was accepted by an earlier pass
    pub fn is_cached(&self, key: &ServiceKey) -> bool {
        self.validated.contains(key)
    }

    /// Number of accepted keys
    pub fn cached_count(&self) -> usize {
        self.validated.len()
    }

    /// Forget every accepted key
    pub fn clear_cache(&self) {
        self.validated.clear();
    }
}
