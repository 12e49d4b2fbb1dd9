//! Container facade
//!
//! [`Container`] ties the registry, the validation engine, the resolver
//! chain, the lifecycle manager and the debugging tools together. It is
//! the only component that mutates the singleton cache and scope buckets.
//!
//! A resolve call moves through these states:
//!
//! - the key is pushed onto the calling thread's resolution stack, or the
//!   call fails with `CircularDependency` if it is already there;
//! - the resolver chain produces an instance, or the call fails with
//!   `UnresolvedDependency` listing every known key;
//! - the lifecycle manager attaches the cleanup hook and the instance is
//!   cached according to its scope;
//! - the key is popped from the stack on every exit path.

mod scoped;
mod stack;
mod stats;

pub use scoped::ScopedResolver;
pub use stats::ContainerStats;

use crate::config::{ConfigLoader, ContainerConfig};
use crate::debugging::{DebuggingTools, DependencyGraph, DiagnosticReport, PerformanceMetrics};
use crate::lifecycle::{DisposalReport, LifecycleManager};
use crate::registry::ServiceRegistry;
use crate::resolver::ResolverChain;
use crate::utils::TimedOperation;
use stack::{ResolutionStacks, StackFrame};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wirebox_domain::{
    Capability, Contract, Error, Implementation, ResolutionRecord, ResolveExt, Result, Scope,
    ScopeContext, ScopeId, ServiceDescriptor, ServiceInstance, ServiceKey, ServiceResolver,
};
use wirebox_validate::{ValidationEngine, ValidationReport};

/// Dependency-injection container
pub struct Container {
    registry: ServiceRegistry,
    validator: ValidationEngine,
    chain: ResolverChain,
    lifecycle: LifecycleManager,
    debugger: DebuggingTools,
    stacks: ResolutionStacks,
    config: ContainerConfig,
    root_context: ScopeContext,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registrations", &self.registry.len())
            .field("singletons", &self.registry.singleton_count())
            .field("open_scopes", &self.lifecycle.open_scopes().len())
            .field("strategies", &self.chain.strategy_names())
            .field("resolving_threads", &self.stacks.active_threads())
            .finish()
    }
}

impl Container {
    /// Create an empty container with default configuration
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Create an empty container with the given configuration
    pub fn with_config(config: ContainerConfig) -> Self {
        Self::with_chain(config, ResolverChain::new())
    }

    /// Create an empty container with a custom resolver chain
    pub fn with_chain(config: ContainerConfig, chain: ResolverChain) -> Self {
        Self {
            registry: ServiceRegistry::new(),
            validator: ValidationEngine::new(),
            debugger: DebuggingTools::new(&config.debugging),
            lifecycle: LifecycleManager::new(),
            stacks: ResolutionStacks::default(),
            root_context: ScopeContext::root(),
            chain,
            config,
        }
    }

    /// Create an empty container configured from file and environment
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load().map(Self::with_config)
    }

    /// Active configuration
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// The underlying registry
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// The underlying lifecycle manager
    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a shared implementation under the key it provides
    pub fn register_singleton(&self, implementation: Implementation) -> Result<()> {
        self.register(ServiceDescriptor::singleton(implementation))
    }

    /// Register a fresh-per-resolve implementation
    pub fn register_transient(&self, implementation: Implementation) -> Result<()> {
        self.register(ServiceDescriptor::transient(implementation))
    }

    /// Register an implementation under an explicit scope
    pub fn register_scoped(&self, implementation: Implementation, scope: Scope) -> Result<()> {
        self.register(ServiceDescriptor::scoped(implementation, scope))
    }

    /// Register a singleton that warm-up skips
    pub fn register_lazy(&self, implementation: Implementation) -> Result<()> {
        self.register(ServiceDescriptor::lazy(implementation))
    }

    /// Register a prebuilt instance of `I`
    pub fn register_instance<I: ?Sized + Send + Sync + 'static>(&self, value: Arc<I>) -> Result<()> {
        self.register(ServiceDescriptor::instance(value))
    }

    /// Register a transient factory for `I`
    pub fn register_factory<I, F>(&self, factory: F) -> Result<()>
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<Arc<I>> + Send + Sync + 'static,
    {
        self.register(ServiceDescriptor::factory::<I, F>(factory))
    }

    /// Register a factory for `I` whose results are cached under `scope`
    pub fn register_scoped_factory<I, F>(&self, factory: F, scope: Scope) -> Result<()>
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<Arc<I>> + Send + Sync + 'static,
    {
        self.register(ServiceDescriptor::factory::<I, F>(factory).with_scope(scope))
    }

    /// Register a descriptor
    ///
    /// Rejects keys that are already registered. When
    /// `registration.validate_on_register` is set the contract check of
    /// [`Container::register_validated`] runs first.
    pub fn register(&self, descriptor: ServiceDescriptor) -> Result<()> {
        if self.config.registration.validate_on_register {
            self.check_registration(&descriptor)?;
        }
        self.store(descriptor)
    }

    /// Register a descriptor after checking constructibility and contract
    pub fn register_validated(&self, descriptor: ServiceDescriptor) -> Result<()> {
        self.check_registration(&descriptor)?;
        self.store(descriptor)
    }

    /// Overwrite the registration of a key
    ///
    /// A singleton already built for the key is evicted and its cleanup
    /// hook runs. Returns true when a previous registration existed.
    pub fn replace(&self, descriptor: ServiceDescriptor) -> Result<bool> {
        if self.config.registration.validate_on_register {
            self.check_registration(&descriptor)?;
        }
        let key = descriptor.key().clone();
        let replacement = self.registry.replace(descriptor)?;
        self.validator.clear_cache();

        if let Some(evicted) = replacement.evicted {
            let report = self.lifecycle.cleanup_instances(std::slice::from_ref(&evicted));
            if !report.is_clean() {
                warn!(key = %key, errors = ?report.errors, "Cleanup of replaced singleton failed");
            }
        }
        info!(key = %key, replaced = replacement.previous.is_some(), "Registration replaced");
        Ok(replacement.previous.is_some())
    }

    /// Declare the members implementations of a capability must expose
    pub fn declare_contract(&self, contract: Contract) -> Result<()> {
        self.registry.declare_contract(contract)?;
        self.validator.clear_cache();
        Ok(())
    }

    /// Declare the contract carried by a [`Capability`] type
    pub fn declare_capability<I: ?Sized + Capability + 'static>(&self) -> Result<()> {
        self.declare_contract(Contract::of::<I>())
    }

    fn check_registration(&self, descriptor: &ServiceDescriptor) -> Result<()> {
        match descriptor.implementation() {
            Some(implementation) => {
                self.validator
                    .validate_registration(descriptor.key(), implementation, &self.registry)
            }
            None => Ok(()),
        }
    }

    fn store(&self, descriptor: ServiceDescriptor) -> Result<()> {
        self.registry.register(descriptor)?;
        self.validator.clear_cache();
        Ok(())
    }

    /// Whether the unqualified key of `T` is registered
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.registry.is_registered(&ServiceKey::of::<T>())
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Resolve the unqualified binding of `T` outside any scope
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

    /// Resolve an explicit key to its type-erased instance
    pub fn resolve_key(&self, key: &ServiceKey) -> Result<ServiceInstance> {
        self.resolve_in(key, &self.root_context)
    }

    /// Resolver with no active buckets
    pub fn resolver(&self) -> ScopedResolver<'_> {
        ScopedResolver::new(self, ScopeContext::root())
    }

    /// Resolver bound to a request bucket
    pub fn request_scope(&self, id: impl Into<ScopeId>) -> ScopedResolver<'_> {
        self.resolver().with_request(id)
    }

    /// Resolver bound to a session bucket
    pub fn session_scope(&self, id: impl Into<ScopeId>) -> ScopedResolver<'_> {
        self.resolver().with_session(id)
    }

    pub(crate) fn resolve_in(&self, key: &ServiceKey, context: &ScopeContext) -> Result<ServiceInstance> {
        let timer = TimedOperation::start();
        let result = self.resolve_tracked(key, context);

        if self.config.debugging.record_resolutions {
            let message = result.as_ref().err().map(ToString::to_string);
            self.debugger
                .record_resolution(key, timer.elapsed_micros(), message.as_deref());
        }
        match &result {
            Ok(_) => debug!(key = %key, micros = timer.elapsed_micros(), "Resolved service"),
            Err(err) => debug!(key = %key, error = %err, "Resolution failed"),
        }
        result
    }

    fn resolve_tracked(&self, key: &ServiceKey, context: &ScopeContext) -> Result<ServiceInstance> {
        let frame = self.stacks.enter(key)?;
        let Some(descriptor) = self.registry.get_descriptor(key) else {
            return Err(self.unresolved(key, &frame));
        };
        let scope = descriptor.scope();

        let bucket = match scope {
            Scope::Request | Scope::Session => {
                let id = context
                    .bucket_for(scope)
                    .ok_or_else(|| Error::ScopeNotActive {
                        key: key.clone(),
                        scope,
                    })?;
                if !self.lifecycle.has_scope(id) {
                    return Err(Error::ScopeNotFound {
                        scope_id: id.to_string(),
                    });
                }
                if let Some(cached) = self.lifecycle.get_scoped(id, key) {
                    return Ok(cached);
                }
                Some(id)
            }
            Scope::Singleton | Scope::Transient => None,
        };

        let resolver = ScopedResolver::new(self, context.clone());
        let Some(instance) = self.chain.resolve(key, &self.registry, &resolver)? else {
            return Err(self.unresolved(key, &frame));
        };
        let instance = self.lifecycle.create_with_lifecycle(instance, descriptor.cleanup());

        match (scope, bucket) {
            (Scope::Singleton, _) => match self.registry.get_singleton_instance(key) {
                Some(cached) if cached.same_instance(&instance) => Ok(cached),
                _ => self.registry.get_or_insert_singleton(key, instance),
            },
            (_, Some(id)) => self.lifecycle.store_scoped(id, instance),
            _ => Ok(instance),
        }
    }

    fn unresolved(&self, key: &ServiceKey, frame: &StackFrame<'_>) -> Error {
        Error::UnresolvedDependency {
            key: key.clone(),
            requested_by: frame.parent().cloned(),
            root: frame.root().cloned(),
            known: self.registry.keys(),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open a request or session bucket; idempotent
    pub fn create_scope(&self, id: impl Into<ScopeId>) -> bool {
        self.lifecycle.create_scope(id)
    }

    /// Dispose a bucket and run its cleanup hooks; unknown ids are ignored
    pub fn dispose_scope(&self, id: impl Into<ScopeId>) -> DisposalReport {
        self.lifecycle.dispose_scope(&id.into())
    }

    /// Dispose every bucket and every cached singleton
    pub fn cleanup_all(&self) -> Result<Vec<DisposalReport>> {
        let singletons = self.registry.drain_singletons()?;
        Ok(self.lifecycle.cleanup_all(&singletons))
    }

    /// Build every non-lazy singleton ahead of first use
    ///
    /// Runs a full validation pass first when
    /// `registration.validate_on_warm_up` is set. Returns the number of
    /// singletons built.
    pub fn warm_up(&self) -> Result<usize> {
        if self.config.registration.validate_on_warm_up {
            self.validate_all_registrations()?;
        }

        let timer = TimedOperation::start();
        let mut built = 0;
        for descriptor in self.registry.descriptors() {
            let key = descriptor.key();
            if descriptor.scope() != Scope::Singleton
                || descriptor.is_lazy()
                || self.registry.has_singleton(key)
            {
                continue;
            }
            self.resolve_key(key)?;
            built += 1;
        }
        info!(built, elapsed_ms = timer.elapsed_ms(), "Container warmed up");
        Ok(built)
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Constructibility and contract check for one registered key
    pub fn validate_registration(&self, key: &ServiceKey) -> Result<()> {
        let descriptor = self
            .registry
            .get_descriptor(key)
            .ok_or_else(|| Error::UnresolvedDependency {
                key: key.clone(),
                requested_by: None,
                root: None,
                known: self.registry.keys(),
            })?;
        match descriptor.implementation() {
            Some(implementation) => {
                self.validator
                    .validate_registration(key, implementation, &self.registry)
            }
            None => Ok(()),
        }
    }

    /// Full validation pass; fails with `ValidationFailed` on any problem
    pub fn validate_all_registrations(&self) -> Result<ValidationReport> {
        self.validation_report().into_result()
    }

    /// Full validation pass returning the report whether or not it passed
    pub fn validation_report(&self) -> ValidationReport {
        self.validator.validate_all_registrations(&self.registry)
    }

    /// Static cycle check starting from the unqualified key of `T`
    pub fn detect_circular_dependencies<T: ?Sized + 'static>(&self) -> Result<()> {
        self.validator
            .detect_circular_dependencies(&ServiceKey::of::<T>(), &self.registry)
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Constructor dependency graph of the current registrations
    pub fn get_dependency_graph(&self) -> DependencyGraph {
        self.debugger.get_dependency_graph(&self.registry)
    }

    /// Aggregated resolution metrics
    pub fn get_performance_metrics(&self) -> PerformanceMetrics {
        self.debugger.get_performance_metrics()
    }

    /// Registrations, open scopes, metrics and recent failures
    pub fn generate_diagnostic_report(&self) -> DiagnosticReport {
        self.debugger
            .generate_diagnostic_report(&self.registry, &self.lifecycle)
    }

    /// Recorded resolutions, oldest first
    pub fn resolution_history(&self) -> Vec<ResolutionRecord> {
        self.debugger.history()
    }

    /// Drop the validation cache and the resolution history
    ///
    /// Registrations and cached instances are kept.
    pub fn clear_cache(&self) {
        self.validator.clear_cache();
        self.debugger.clear_history();
        debug!("Cleared validation cache and resolution history");
    }

    /// Remove every registration, contract and cached singleton
    ///
    /// Cleanup hooks are not run; call [`Container::cleanup_all`] first
    /// when cached singletons hold resources.
    pub fn clear_registrations(&self) -> Result<()> {
        self.registry.clear_all()?;
        self.validator.clear_cache();
        Ok(())
    }

    /// Point-in-time counters
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            registrations: self.registry.len(),
            singletons_cached: self.registry.singleton_count(),
            open_scopes: self.lifecycle.open_scopes().len(),
            resolutions_recorded: self.debugger.history_len(),
            validated_keys: self.validator.cached_count(),
            strategies: self.chain.strategy_names(),
        }
    }

    /// Depth of the calling thread's resolution stack
    pub fn resolution_depth(&self) -> usize {
        self.stacks.depth()
    }
}

impl ServiceResolver for Container {
    fn resolve_instance(&self, key: &ServiceKey) -> Result<ServiceInstance> {
        self.resolve_key(key)
    }

    fn contains(&self, key: &ServiceKey) -> bool {
        self.registry.is_registered(key)
    }

    fn scope_context(&self) -> &ScopeContext {
        &self.root_context
    }
}
