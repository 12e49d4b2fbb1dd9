//! # Wirebox runtime
//!
//! The moving parts of the container: the service registry, the resolver
//! chain, scope lifecycles, debugging tools and the [`Container`] facade
//! that ties them together, plus configuration loading and logging setup.
//!
//! ```
//! use std::sync::Arc;
//! use wirebox_runtime::Container;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let container = Container::new();
//! container
//!     .register_instance::<dyn Greeter>(Arc::new(English))
//!     .unwrap();
//!
//! let greeter = container.resolve::<dyn Greeter>().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

pub mod config;
pub mod constants;
pub mod container;
pub mod debugging;
pub mod error_ext;
pub mod global;
pub mod lifecycle;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod utils;

pub use config::{ConfigLoader, ContainerConfig};
pub use container::{Container, ContainerStats, ScopedResolver};
pub use debugging::{DebuggingTools, DependencyGraph, DiagnosticReport, PerformanceMetrics};
pub use error_ext::ErrorContext;
pub use global::{get_container, reset_container, set_container, try_get_container};
pub use lifecycle::{DisposalReport, LifecycleManager};
pub use registry::{Replacement, ServiceRegistry};
pub use resolver::{ResolutionStrategy, ResolverChain};
