//! # wirebox domain layer
//!
//! Core types shared by every wirebox crate. Nothing in here performs
//! resolution; the types only describe *what* is bound and *how* it may be
//! constructed.
//!
//! ## Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`value_objects`] | Service keys, scopes, resolution records, dependency edges |
//! | [`registration`] | Bindings, descriptors, implementations, type-erased instances |
//! | [`ports`] | Resolver, registry view, disposal and capability contracts |
//! | [`error`] | Error taxonomy shared by all layers |
//! | [`constants`] | Domain constants |

pub mod constants;
pub mod error;
pub mod ports;
pub mod registration;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{Capability, Disposable, RegistryView, ResolveExt, ServiceResolver};
pub use registration::{
    Arguments, Binding, BindingKind, CleanupHook, Constructor, Contract, FactoryFn,
    Implementation, Injectable, ParamType, Parameter, ServiceDescriptor, ServiceInstance,
};
pub use value_objects::{DependencyEdge, ResolutionRecord, Scope, ScopeContext, ScopeId, ServiceKey};
