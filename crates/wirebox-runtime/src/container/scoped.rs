//! Scoped resolvers

use super::Container;
use std::sync::Arc;
use wirebox_domain::{
    ResolveExt, Result, ScopeContext, ScopeId, ServiceInstance, ServiceKey, ServiceResolver,
};

/// A view of a container bound to request and/or session buckets
///
/// Request-scoped services resolved through it are cached in its request
/// bucket and session-scoped services in its session bucket. Nested
/// resolves (constructor arguments, factory lookups) inherit the same
/// buckets.
#[derive(Debug, Clone)]
pub struct ScopedResolver<'a> {
    container: &'a Container,
    context: ScopeContext,
}

impl<'a> ScopedResolver<'a> {
    pub(crate) fn new(container: &'a Container, context: ScopeContext) -> Self {
        Self { container, context }
    }

    /// Use `id` as the request bucket
    #[must_use]
    pub fn with_request(mut self, id: impl Into<ScopeId>) -> Self {
        self.context = self.context.with_request(id);
        self
    }

    /// Use `id` as the session bucket
    #[must_use]
    pub fn with_session(mut self, id: impl Into<ScopeId>) -> Self {
        self.context = self.context.with_session(id);
        self
    }

    /// The container this resolver reads from
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// Resolve the unqualified binding of `T`
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        ResolveExt::resolve::<T>(self)
    }

    /// Resolve the binding of `T` registered under `qualifier`
    pub fn resolve_named<T: ?Sized + Send + Sync + 'static>(&self, qualifier: &str) -> Result<Arc<T>> {
        ResolveExt::resolve_named::<T>(self, qualifier)
    }

    /// Resolve `T`, or `None` when `T` is not registered
    pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        ResolveExt::try_resolve::<T>(self)
    }
}

impl ServiceResolver for ScopedResolver<'_> {
    fn resolve_instance(&self, key: &ServiceKey) -> Result<ServiceInstance> {
        self.container.resolve_in(key, &self.context)
    }

    fn contains(&self, key: &ServiceKey) -> bool {
        self.container.registry().is_registered(key)
    }

    fn scope_context(&self) -> &ScopeContext {
        &self.context
    }
}
