//! Dependency chain checks

use crate::introspection::required_dependencies;
use wirebox_domain::{Error, Implementation, RegistryView, Result, ServiceKey};

/// Every required dependency of `implementation` that has no registration
pub fn unresolved_dependencies(
    key: &ServiceKey,
    implementation: &Implementation,
    registry: &dyn RegistryView,
) -> Vec<Error> {
    let missing: Vec<ServiceKey> = required_dependencies(implementation)
        .filter(|dependency| !registry.is_registered(&dependency.key))
        .map(|dependency| dependency.key)
        .collect();
    if missing.is_empty() {
        return Vec::new();
    }

    let known = registry.registered_keys();
    missing
        .into_iter()
        .map(|dependency| Error::UnresolvedDependency {
            key: dependency,
            requested_by: Some(key.clone()),
            root: None,
            known: known.clone(),
        })
        .collect()
}

/// Check that every required dependency of `implementation` is registered
///
/// Primitive parameters and parameters with defaults are skipped. Fails on
/// the first missing dependency.
pub fn validate_dependency_chain(
    key: &ServiceKey,
    implementation: &Implementation,
    registry: &dyn RegistryView,
) -> Result<()> {
    match unresolved_dependencies(key, implementation, registry)
        .into_iter()
        .next()
    {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
