//! Constructor introspection
//!
//! The one place that decides which constructor parameters are service
//! dependencies. Chain validation, cycle detection, the dependency graph
//! and constructor injection all read [`constructor_dependencies`].

use crate::primitives::is_primitive_type;
use wirebox_domain::{DependencyEdge, Implementation, ServiceKey};

/// A constructor parameter that must be satisfied from the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Parameter name the argument is passed under
    pub parameter: &'static str,
    /// Key resolved for the parameter (the inner `T` of `Option<T>`)
    pub key: ServiceKey,
    /// False when the parameter carries a default
    pub required: bool,
}

/// Service dependencies of an implementation, in parameter order
///
/// Value and primitive parameters are skipped. Parameters with a default are kept but
/// marked as not required.
pub fn constructor_dependencies(implementation: &Implementation) -> Vec<Dependency> {
    implementation
        .constructor()
        .params()
        .iter()
        .filter(|param| !param.is_value() && !is_primitive_type(param.ty()))
        .map(|param| Dependency {
            parameter: param.name(),
            key: param.ty().key().clone(),
            required: !param.has_default(),
        })
        .collect()
}

/// Required dependencies only
pub fn required_dependencies(implementation: &Implementation) -> impl Iterator<Item = Dependency> {
    constructor_dependencies(implementation)
        .into_iter()
        .filter(|dependency| dependency.required)
}

/// Graph edges from `from` to each of its dependencies
pub fn dependency_edges(from: &ServiceKey, implementation: &Implementation) -> Vec<DependencyEdge> {
    constructor_dependencies(implementation)
        .into_iter()
        .map(|dependency| DependencyEdge {
            from: from.clone(),
            to: dependency.key,
            parameter: dependency.parameter,
            required: dependency.required,
        })
        .collect()
}
