//! Registration validation for wirebox
//!
//! This crate checks registrations without constructing anything:
//! - Structural constructibility (no abstract interface markers)
//! - Capability contract compliance (every required member present)
//! - Dependency chain resolvability (every required parameter registered)
//! - Circular dependencies
//!
//! All checks read the registry through [`wirebox_domain::RegistryView`] and
//! share one introspection step, [`constructor_dependencies`], so static
//! validation and constructor injection always agree on what a dependency is.
//!
//! ```ignore
//! use wirebox_validate::{Reporter, ValidationEngine};
//!
//! let engine = ValidationEngine::new();
//! let report = engine.validate_all_registrations(&registry);
//! println!("{}", Reporter::to_human_readable(&report));
//! report.into_result()?;
//! ```

pub mod chain;
pub mod contracts;
pub mod cycles;
pub mod engine;
pub mod introspection;
pub mod primitives;
pub mod report;

pub use chain::{unresolved_dependencies, validate_dependency_chain};
pub use contracts::{validate_protocol_implementation, validate_registration};
pub use cycles::{CycleAnalysis, analyze_cycles, detect_circular_dependencies, find_cycles};
pub use engine::ValidationEngine;
pub use introspection::{Dependency, constructor_dependencies, dependency_edges};
pub use primitives::is_primitive_type;
pub use report::{FailureCategory, Reporter, ValidationFailure, ValidationReport, ValidationSummary};
