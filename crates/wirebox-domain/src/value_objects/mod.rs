//! Value objects
//!
//! Immutable identifiers and records shared by every layer.

pub mod key;
pub mod records;
pub mod scope;

pub use key::{ServiceKey, short_type_name};
pub use records::{DependencyEdge, ResolutionRecord};
pub use scope::{Scope, ScopeContext, ScopeId};
