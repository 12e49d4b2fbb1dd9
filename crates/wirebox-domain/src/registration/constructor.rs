//! Constructor declarations and argument passing
//!
//! Implementations describe their constructor explicitly: every parameter
//! has a name, a declared type and a flag saying whether it can fall back
//! to a default. Introspection and constructor injection both read this
//! declaration, so the two can never disagree.

use super::instance::ServiceInstance;
use crate::error::{Error, Result};
use crate::value_objects::ServiceKey;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Declared type of a constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamType {
    key: ServiceKey,
    optional: bool,
}

impl ParamType {
    /// Plain parameter type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            key: ServiceKey::of::<T>(),
            optional: false,
        }
    }

    /// Parameter type `Option<T>`
    pub fn optional<T: ?Sized + 'static>() -> Self {
        Self {
            key: ServiceKey::of::<T>(),
            optional: true,
        }
    }

    /// Qualified parameter type `T`
    pub fn named<T: ?Sized + 'static>(qualifier: impl Into<String>) -> Self {
        Self {
            key: ServiceKey::named::<T>(qualifier),
            optional: false,
        }
    }

    /// Key of the inner type (the `T` of `Option<T>`)
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// True when declared as `Option<T>`
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "Option<{}>", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// One constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: &'static str,
    ty: ParamType,
    has_default: bool,
    value: bool,
}

impl Parameter {
    /// Required service dependency
    pub fn service<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::of::<T>(),
            has_default: false,
            value: false,
        }
    }

    /// Required dependency on a qualified binding
    pub fn named_service<T: ?Sized + 'static>(
        name: &'static str,
        qualifier: impl Into<String>,
    ) -> Self {
        Self {
            name,
            ty: ParamType::named::<T>(qualifier),
            has_default: false,
            value: false,
        }
    }

    /// `Option<T>` dependency, injected only when `T` is registered
    pub fn optional<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::optional::<T>(),
            has_default: true,
            value: false,
        }
    }

    /// Value parameter the constructor supplies itself
    ///
    /// Never resolved from the registry, whatever `T` is.
    pub fn value<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::of::<T>(),
            has_default: false,
            value: true,
        }
    }

    /// Service dependency that falls back to a default when unregistered
    pub fn defaulted<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::of::<T>(),
            has_default: true,
            value: false,
        }
    }

    /// Parameter name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter type
    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    /// Whether the constructor can run without this argument
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// True for parameters declared with [`Parameter::value`]
    pub fn is_value(&self) -> bool {
        self.value
    }
}

/// Ordered list of constructor parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructor {
    params: Vec<Parameter>,
}

impl Constructor {
    /// Constructor that takes no arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.params.push(parameter);
        self
    }

    /// Declared parameters in order
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Number of declared parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True for a zero-argument constructor
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Resolved constructor arguments, keyed by parameter name
#[derive(Debug, Clone)]
pub struct Arguments {
    owner: ServiceKey,
    values: HashMap<&'static str, ServiceInstance>,
}

impl Arguments {
    /// Empty argument set for the service being built
    pub fn new(owner: ServiceKey) -> Self {
        Self {
            owner,
            values: HashMap::new(),
        }
    }

    /// Supply an argument
    pub fn insert(&mut self, name: &'static str, instance: ServiceInstance) {
        self.values.insert(name, instance);
    }

    /// The service these arguments are for
    pub fn owner(&self) -> &ServiceKey {
        &self.owner
    }

    /// Fetch a required argument
    pub fn get<T: ?Sized + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let instance = self.values.get(name).ok_or_else(|| {
            Error::construction(
                self.owner.clone(),
                format!("argument '{name}' was not supplied"),
            )
        })?;
        instance.downcast_or_err::<T>()
    }

    /// Fetch an argument that may have been left out
    pub fn optional<T: ?Sized + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.values.get(name).and_then(ServiceInstance::downcast::<T>)
    }

    /// Whether an argument was supplied
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of supplied arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
