//! Service descriptors
//!
//! A descriptor is everything the registry stores for one key: how the
//! instance is produced, how long it lives and how it is cleaned up.

use super::implementation::Implementation;
use super::instance::{CleanupHook, ServiceInstance};
use crate::error::{Error, Result};
use crate::ports::{Disposable, ServiceResolver};
use crate::value_objects::{Scope, ServiceKey};
use serde::Serialize;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Factory callback; receives the key being built and a resolver for its dependencies
pub type FactoryFn =
    Arc<dyn Fn(&ServiceKey, &dyn ServiceResolver) -> Result<ServiceInstance> + Send + Sync>;

/// How a registered key produces its instance
#[derive(Clone)]
pub enum Binding {
    /// Construct a concrete type through its declared constructor
    Implementation(Implementation),
    /// Call a user-supplied factory
    Factory(FactoryFn),
    /// Hand out a prebuilt instance
    Instance(ServiceInstance),
}

impl Binding {
    /// Wrap a typed factory
    pub fn factory<I, F>(factory: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<Arc<I>> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(move |key: &ServiceKey, resolver: &dyn ServiceResolver| {
            factory(resolver).map(|value| ServiceInstance::new(key.clone(), value))
        }))
    }

    /// Wrap a prebuilt value
    pub fn instance<I: ?Sized + Send + Sync + 'static>(value: Arc<I>) -> Self {
        Self::Instance(ServiceInstance::new(ServiceKey::of::<I>(), value))
    }

    /// Discriminant without the payload
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Implementation(_) => BindingKind::Implementation,
            Self::Factory(_) => BindingKind::Factory,
            Self::Instance(_) => BindingKind::Instance,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implementation(implementation) => {
                f.debug_tuple("Implementation").field(implementation).finish()
            }
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
        }
    }
}

/// Kind of binding, used in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    /// Constructor injection
    Implementation,
    /// User factory
    Factory,
    /// Prebuilt instance
    Instance,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Implementation => "implementation",
            Self::Factory => "factory",
            Self::Instance => "instance",
        };
        f.write_str(name)
    }
}

/// Registration record for one key
#[derive(Clone)]
pub struct ServiceDescriptor {
    key: ServiceKey,
    binding: Binding,
    scope: Scope,
    lazy: bool,
    cleanup: Option<CleanupHook>,
    cleanup_type: Option<(TypeId, &'static str)>,
}

impl ServiceDescriptor {
    /// Descriptor for an explicit key
    ///
    /// Factories default to transient, everything else to singleton.
    pub fn new(key: ServiceKey, binding: Binding) -> Self {
        let scope = match binding {
            Binding::Factory(_) => Scope::Transient,
            Binding::Implementation(_) | Binding::Instance(_) => Scope::Singleton,
        };
        let binding = match binding {
            Binding::Instance(instance) => Binding::Instance(instance.with_key(key.clone())),
            other => other,
        };
        Self {
            key,
            binding,
            scope,
            lazy: false,
            cleanup: None,
            cleanup_type: None,
        }
    }

    /// Shared instance, built eagerly on warm-up
    pub fn singleton(implementation: Implementation) -> Self {
        Self::scoped(implementation, Scope::Singleton)
    }

    /// Fresh instance per resolve
    pub fn transient(implementation: Implementation) -> Self {
        Self::scoped(implementation, Scope::Transient)
    }

    /// Implementation bound under an explicit scope
    pub fn scoped(implementation: Implementation, scope: Scope) -> Self {
        let key = implementation.provides().clone();
        Self::new(key, Binding::Implementation(implementation)).with_scope(scope)
    }

    /// Singleton built on first resolve rather than on warm-up
    pub fn lazy(implementation: Implementation) -> Self {
        Self::singleton(implementation).with_lazy(true)
    }

    /// Transient factory for `I`
    pub fn factory<I, F>(factory: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<Arc<I>> + Send + Sync + 'static,
    {
        Self::new(ServiceKey::of::<I>(), Binding::factory::<I, F>(factory))
    }

    /// Prebuilt singleton for `I`
    pub fn instance<I: ?Sized + Send + Sync + 'static>(value: Arc<I>) -> Self {
        Self::new(ServiceKey::of::<I>(), Binding::instance(value))
    }

    /// Change the lifetime
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Toggle deferred construction
    #[must_use]
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Re-key the descriptor (for qualified registrations)
    #[must_use]
    pub fn with_key(mut self, key: ServiceKey) -> Self {
        self.binding = match self.binding {
            Binding::Instance(instance) => Binding::Instance(instance.with_key(key.clone())),
            other => other,
        };
        self.key = key;
        self
    }

    /// Attach a typed cleanup callback
    #[must_use]
    pub fn with_cleanup<I, F>(mut self, cleanup: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&I) -> Result<()> + Send + Sync + 'static,
    {
        let hook: CleanupHook = Arc::new(move |instance: &ServiceInstance| {
            let typed = instance.downcast::<I>().ok_or_else(|| Error::TypeMismatch {
                key: instance.key().clone(),
                expected: std::any::type_name::<I>(),
            })?;
            cleanup(typed.as_ref())
        });
        self.cleanup = Some(hook);
        self.cleanup_type = Some((TypeId::of::<I>(), std::any::type_name::<I>()));
        self
    }

    /// Run [`Disposable::dispose`] when the instance is released
    #[must_use]
    pub fn disposable<I>(self) -> Self
    where
        I: ?Sized + Disposable + 'static,
    {
        self.with_cleanup::<I, _>(|service: &I| service.dispose())
    }

    /// The registered key
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// How the instance is produced
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The implementation, for constructor bindings
    pub fn implementation(&self) -> Option<&Implementation> {
        match &self.binding {
            Binding::Implementation(implementation) => Some(implementation),
            Binding::Factory(_) | Binding::Instance(_) => None,
        }
    }

    /// Binding discriminant
    pub fn binding_kind(&self) -> BindingKind {
        self.binding.kind()
    }

    /// Lifetime of produced instances
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Whether warm-up skips this key
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Cleanup callback, if any
    pub fn cleanup(&self) -> Option<&CleanupHook> {
        self.cleanup.as_ref()
    }

    /// Type the cleanup callback expects, with its name
    pub fn cleanup_type(&self) -> Option<(TypeId, &'static str)> {
        self.cleanup_type
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("key", &self.key)
            .field("binding", &self.binding)
            .field("scope", &self.scope)
            .field("lazy", &self.lazy)
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}
