//! # wirebox
//!
//! A dependency-injection container for applications that wire their
//! collaborators at startup.
//!
//! Services are registered against a [`ServiceKey`] with a lifetime
//! ([`Scope`]) and a binding: a constructor-injected [`Implementation`], a
//! factory closure, or a prebuilt instance. Resolving a key builds its
//! dependencies first, caches singletons and scoped instances, and reports
//! missing registrations and cycles with the full path that led to them.
//!
//! ## Example
//!
//! ```
//! use wirebox::prelude::*;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct SystemClock;
//!
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 {
//!         1_700_000_000
//!     }
//! }
//!
//! impl Injectable for SystemClock {
//!     fn constructor() -> Constructor {
//!         Constructor::new()
//!     }
//!
//!     fn construct(_args: &Arguments) -> Result<Self> {
//!         Ok(Self)
//!     }
//! }
//!
//! struct Scheduler {
//!     clock: Arc<dyn Clock>,
//! }
//!
//! impl Injectable for Scheduler {
//!     fn constructor() -> Constructor {
//!         Constructor::new().param(Parameter::service::<dyn Clock>("clock"))
//!     }
//!
//!     fn construct(args: &Arguments) -> Result<Self> {
//!         Ok(Self { clock: args.get::<dyn Clock>("clock")? })
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_singleton(Implementation::bind::<dyn Clock, SystemClock>(|clock| clock))?;
//! container.register_transient(Implementation::of::<Scheduler>())?;
//! container.validate_all_registrations()?;
//!
//! let scheduler = container.resolve::<Scheduler>()?;
//! assert_eq!(scheduler.clock.now(), 1_700_000_000);
//! # Ok::<(), wirebox::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - `domain` - keys, scopes, descriptors, instances, ports and errors
//! - `validate` - static checks over a registry snapshot
//! - `runtime` - registry, resolver chain, lifecycle, diagnostics and the container

/// Domain layer - keys, descriptors and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use wirebox_domain::*;
}

/// Validation layer - contracts, dependency chains and cycles
///
/// Re-exports from the validation crate for convenience
pub mod validate {
    pub use wirebox_validate::*;
}

/// Runtime layer - container, configuration, logging and diagnostics
///
/// Re-exports from the runtime crate for convenience
pub mod runtime {
    pub use wirebox_runtime::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the container and its companions at the crate root
pub use runtime::{
    ConfigLoader, Container, ContainerConfig, ContainerStats, DependencyGraph, DiagnosticReport,
    DisposalReport, PerformanceMetrics, ScopedResolver, get_container, reset_container,
    set_container, try_get_container,
};

// Re-export validation reports at the crate root
pub use validate::{FailureCategory, Reporter, ValidationReport};

/// Everything needed to declare and resolve services
pub mod prelude {
    pub use std::sync::Arc;
    pub use wirebox_domain::{
        Arguments, Capability, Constructor, Disposable, Error, Implementation, Injectable,
        Parameter, ResolveExt, Result, Scope, ServiceDescriptor, ServiceKey, ServiceResolver,
    };
    pub use wirebox_runtime::{Container, ScopedResolver};
}
