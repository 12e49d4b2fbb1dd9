//! Resolver ports

use crate::error::{Error, Result};
use crate::registration::ServiceInstance;
use crate::value_objects::{ScopeContext, ServiceKey};
use std::sync::Arc;

/// Object-safe resolution interface handed to factories and strategies
pub trait ServiceResolver: Send + Sync {
    /// Resolve the instance bound to `key`
    fn resolve_instance(&self, key: &ServiceKey) -> Result<ServiceInstance>;

    /// Whether `key` has a registration
    fn contains(&self, key: &ServiceKey) -> bool;

    /// Request and session scopes active for this resolver
    fn scope_context(&self) -> &ScopeContext;
}

/// Typed helpers over any [`ServiceResolver`]
pub trait ResolveExt: ServiceResolver {
    /// Resolve the unqualified binding of `T`
    fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.resolve_keyed::<T>(&ServiceKey::of::<T>())
    }

    /// Resolve the binding of `T` registered under `qualifier`
    fn resolve_named<T: ?Sized + Send + Sync + 'static>(&self, qualifier: &str) -> Result<Arc<T>> {
        self.resolve_keyed::<T>(&ServiceKey::named::<T>(qualifier))
    }

    /// Resolve `T`, or `None` when `T` itself is not registered
    ///
    /// Failures inside a registered binding still surface as errors.
    fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        let key = ServiceKey::of::<T>();
        if !self.contains(&key) {
            return Ok(None);
        }
        self.resolve_keyed::<T>(&key).map(Some)
    }

    /// Resolve an explicit key as `T`
    fn resolve_keyed<T: ?Sized + Send + Sync + 'static>(&self, key: &ServiceKey) -> Result<Arc<T>> {
        let instance = self.resolve_instance(key)?;
        instance.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
            key: key.clone(),
            expected: std::any::type_name::<T>(),
        })
    }
}

impl<R: ServiceResolver + ?Sized> ResolveExt for R {}
