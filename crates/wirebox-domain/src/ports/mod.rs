//! Domain Port Interfaces
//!
//! Boundary contracts between the domain and the runtime. The runtime
//! implements [`ServiceResolver`] and [`RegistryView`]; user services
//! implement [`Disposable`] and declare [`Capability`] contracts.

/// Disposal and capability contracts for user services
pub mod lifecycle;
/// Read-only registry access used by validation
pub mod registry;
/// Resolution entry points
pub mod resolver;

pub use lifecycle::{Capability, Disposable};
pub use registry::RegistryView;
pub use resolver::{ResolveExt, ServiceResolver};
