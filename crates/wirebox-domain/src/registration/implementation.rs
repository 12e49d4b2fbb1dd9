//! Implementation bindings

use super::constructor::{Arguments, Constructor};
use super::instance::ServiceInstance;
use crate::error::{Error, Result};
use crate::value_objects::ServiceKey;
use std::fmt;
use std::sync::Arc;

/// Builds an instance for a key from resolved constructor arguments
pub type BuildFn = Arc<dyn Fn(&ServiceKey, &Arguments) -> Result<ServiceInstance> + Send + Sync>;

/// A concrete type the container can construct
///
/// `constructor()` declares the parameters; the container resolves them and
/// hands them to `construct` as named [`Arguments`].
///
/// # Example
///
/// ```
/// use wirebox_domain::{Arguments, Constructor, Injectable, Parameter, Result};
/// use std::sync::Arc;
///
/// struct Config;
/// struct Repository {
///     config: Arc<Config>,
/// }
///
/// impl Injectable for Repository {
///     fn constructor() -> Constructor {
///         Constructor::new().param(Parameter::service::<Config>("config"))
///     }
///
///     fn construct(args: &Arguments) -> Result<Self> {
///         Ok(Self { config: args.get::<Config>("config")? })
///     }
/// }
///
/// assert_eq!(Repository::constructor().len(), 1);
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Declared constructor parameters
    fn constructor() -> Constructor;

    /// Build the value from resolved arguments
    fn construct(args: &Arguments) -> Result<Self>;

    /// Public members the type exposes, checked against capability contracts
    fn members() -> &'static [&'static str] {
        &[]
    }
}

/// What a binding constructs, and how
#[derive(Clone)]
pub struct Implementation {
    provides: ServiceKey,
    type_name: &'static str,
    constructor: Constructor,
    members: Vec<&'static str>,
    build: Option<BuildFn>,
}

impl Implementation {
    /// Bind a concrete type to itself
    pub fn of<T: Injectable>() -> Self {
        Self::bind::<T, T>(|value| value)
    }

    /// Bind a concrete type `T` to the capability `I`
    ///
    /// `cast` performs the unsizing coercion, usually `|t| t`.
    pub fn bind<I, T>(cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        T: Injectable,
    {
        let build: BuildFn = Arc::new(move |key: &ServiceKey, args: &Arguments| {
            let value = T::construct(args)?;
            Ok(ServiceInstance::new(key.clone(), cast(Arc::new(value))))
        });
        Self {
            provides: ServiceKey::of::<I>(),
            type_name: std::any::type_name::<T>(),
            constructor: T::constructor(),
            members: T::members().to_vec(),
            build: Some(build),
        }
    }

    /// An abstract capability with no constructor
    ///
    /// Registering one is rejected; it exists so registries and tests can
    /// describe interfaces that were never given a concrete type.
    pub fn interface_marker<I: ?Sized + 'static>() -> Self {
        Self {
            provides: ServiceKey::of::<I>(),
            type_name: std::any::type_name::<I>(),
            constructor: Constructor::new(),
            members: Vec::new(),
            build: None,
        }
    }

    /// Override the declared member list
    #[must_use]
    pub fn with_members(mut self, members: &[&'static str]) -> Self {
        self.members = members.to_vec();
        self
    }

    /// Override the declared constructor
    #[must_use]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = constructor;
        self
    }

    /// Key of the capability this produces
    pub fn provides(&self) -> &ServiceKey {
        &self.provides
    }

    /// Name of the concrete type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared constructor
    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    /// Declared public members
    pub fn members(&self) -> &[&'static str] {
        &self.members
    }

    /// Whether the member is declared
    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|candidate| *candidate == member)
    }

    /// False for interface markers
    pub fn is_constructible(&self) -> bool {
        self.build.is_some()
    }

    /// Construct an instance for `key`
    pub fn instantiate(&self, key: &ServiceKey, args: &Arguments) -> Result<ServiceInstance> {
        let build = self.build.as_ref().ok_or_else(|| {
            Error::configuration(format!(
                "{} is abstract and cannot be instantiated",
                self.type_name
            ))
        })?;
        build(key, args)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("provides", &self.provides)
            .field("type_name", &self.type_name)
            .field("constructor", &self.constructor)
            .field("members", &self.members)
            .field("constructible", &self.is_constructible())
            .finish()
    }
}
