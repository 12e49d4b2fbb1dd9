//! Registration model
//!
//! Everything a caller hands to the registry: implementations with their
//! declared constructors, factories, prebuilt instances and contracts.

mod constructor;
mod contract;
mod descriptor;
mod implementation;
mod instance;

pub use constructor::{Arguments, Constructor, ParamType, Parameter};
pub use contract::Contract;
pub use descriptor::{Binding, BindingKind, FactoryFn, ServiceDescriptor};
pub use implementation::{BuildFn, Implementation, Injectable};
pub use instance::{CleanupHook, ServiceInstance};
