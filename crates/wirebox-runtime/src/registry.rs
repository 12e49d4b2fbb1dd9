//! Service registry
//!
//! The authoritative table of bindings, the singleton cache and declared
//! capability contracts. One `RwLock` guards all three tables; no lock is
//! ever held while user code (factories, constructors, hooks) runs.

use crate::utils::{lock_rwlock_write, recover_poisoned};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tracing::{debug, warn};
use wirebox_domain::{
    Binding, Contract, Error, FactoryFn, Implementation, RegistryView, Result, Scope,
    ServiceDescriptor, ServiceInstance, ServiceKey,
};

#[derive(Default)]
struct RegistryTables {
    descriptors: HashMap<ServiceKey, Arc<ServiceDescriptor>>,
    singletons: HashMap<ServiceKey, ServiceInstance>,
    contracts: HashMap<TypeId, Contract>,
}

/// Outcome of [`ServiceRegistry::replace`]
#[derive(Debug, Default)]
pub struct Replacement {
    /// Descriptor that was overwritten, if any
    pub previous: Option<Arc<ServiceDescriptor>>,
    /// Singleton evicted from the cache, if one had been built
    pub evicted: Option<ServiceInstance>,
}

/// Authoritative binding table
#[derive(Default)]
pub struct ServiceRegistry {
    tables: RwLock<RegistryTables>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryTables> {
        recover_poisoned(self.tables.read(), "service registry")
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Bind `key` to a shared implementation
    pub fn register_singleton(&self, key: ServiceKey, implementation: Implementation) -> Result<()> {
        self.register(ServiceDescriptor::singleton(implementation).with_key(key))
            .map(drop)
    }

    /// Bind `key` to a fresh-per-resolve implementation
    pub fn register_transient(&self, key: ServiceKey, implementation: Implementation) -> Result<()> {
        self.register(ServiceDescriptor::transient(implementation).with_key(key))
            .map(drop)
    }

    /// Bind `key` to a prebuilt instance
    pub fn register_instance(&self, key: ServiceKey, instance: ServiceInstance) -> Result<()> {
        self.register(ServiceDescriptor::new(key, Binding::Instance(instance)))
            .map(drop)
    }

    /// Bind `key` to a transient factory
    pub fn register_factory(&self, key: ServiceKey, factory: FactoryFn) -> Result<()> {
        self.register(ServiceDescriptor::new(key, Binding::Factory(factory)))
            .map(drop)
    }

    /// Bind `key` to an implementation under an explicit scope
    pub fn register_scoped(
        &self,
        key: ServiceKey,
        implementation: Implementation,
        scope: Scope,
    ) -> Result<()> {
        self.register(ServiceDescriptor::scoped(implementation, scope).with_key(key))
            .map(drop)
    }

    /// Bind `key` to a singleton skipped by warm-up
    pub fn register_lazy(&self, key: ServiceKey, implementation: Implementation) -> Result<()> {
        self.register(ServiceDescriptor::lazy(implementation).with_key(key))
            .map(drop)
    }

    /// Store a descriptor; an existing key is rejected with `AlreadyRegistered`
    pub fn register(&self, descriptor: ServiceDescriptor) -> Result<Arc<ServiceDescriptor>> {
        check_descriptor(&descriptor)?;
        let descriptor = Arc::new(descriptor);
        let key = descriptor.key().clone();

        let mut tables = lock_rwlock_write(&self.tables, "register")?;
        if tables.descriptors.contains_key(&key) {
            warn!(key = %key, "Rejected duplicate registration");
            return Err(Error::AlreadyRegistered { key });
        }
        tables.descriptors.insert(key.clone(), Arc::clone(&descriptor));
        drop(tables);

        debug!(
            key = %key,
            binding = %descriptor.binding_kind(),
            scope = %descriptor.scope(),
            lazy = descriptor.is_lazy(),
            "Registered service"
        );
        Ok(descriptor)
    }

    /// Store a descriptor, overwriting any existing one
    ///
    /// The cached singleton for the key, if any, is evicted and handed back
    /// so the caller can dispose of it.
    pub fn replace(&self, descriptor: ServiceDescriptor) -> Result<Replacement> {
        check_descriptor(&descriptor)?;
        let key = descriptor.key().clone();

        let mut tables = lock_rwlock_write(&self.tables, "replace")?;
        let previous = tables.descriptors.insert(key.clone(), Arc::new(descriptor));
        let evicted = tables.singletons.remove(&key);
        drop(tables);

        debug!(key = %key, replaced = previous.is_some(), "Replaced service registration");
        Ok(Replacement { previous, evicted })
    }

    /// Declare the contract implementations of a capability must satisfy
    pub fn declare_contract(&self, contract: Contract) -> Result<()> {
        let mut tables = lock_rwlock_write(&self.tables, "declare_contract")?;
        debug!(capability = %contract.capability(), "Declared capability contract");
        tables
            .contracts
            .insert(contract.capability().type_id(), contract);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Whether `key` has a binding
    pub fn is_registered(&self, key: &ServiceKey) -> bool {
        self.read().descriptors.contains_key(key)
    }

    /// Descriptor registered for `key`
    pub fn get_descriptor(&self, key: &ServiceKey) -> Option<Arc<ServiceDescriptor>> {
        self.read().descriptors.get(key).cloned()
    }

    /// Implementation bound to `key`, for constructor bindings
    pub fn get_service_implementation(&self, key: &ServiceKey) -> Option<Implementation> {
        self.read()
            .descriptors
            .get(key)
            .and_then(|descriptor| descriptor.implementation().cloned())
    }

    /// Contract declared for the capability type of `key`
    pub fn contract_for(&self, key: &ServiceKey) -> Option<Contract> {
        self.read().contracts.get(&key.type_id()).cloned()
    }

    /// Snapshot of every constructor binding, ordered by key
    pub fn get_all_registrations(&self) -> BTreeMap<ServiceKey, Implementation> {
        self.read()
            .descriptors
            .iter()
            .filter_map(|(key, descriptor)| {
                descriptor
                    .implementation()
                    .map(|implementation| (key.clone(), implementation.clone()))
            })
            .collect()
    }

    /// Snapshot of every descriptor, ordered by key
    pub fn descriptors(&self) -> Vec<Arc<ServiceDescriptor>> {
        let mut descriptors: Vec<Arc<ServiceDescriptor>> =
            self.read().descriptors.values().cloned().collect();
        descriptors.sort_by(|a, b| a.key().cmp(b.key()));
        descriptors
    }

    /// Every registered key, sorted
    pub fn keys(&self) -> Vec<ServiceKey> {
        let mut keys: Vec<ServiceKey> = self.read().descriptors.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registered keys
    pub fn len(&self) -> usize {
        self.read().descriptors.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.read().descriptors.is_empty()
    }

    // ------------------------------------------------------------------
    // Singleton cache
    // ------------------------------------------------------------------

    /// Cached singleton for `key`
    pub fn get_singleton_instance(&self, key: &ServiceKey) -> Option<ServiceInstance> {
        self.read().singletons.get(key).cloned()
    }

    /// Cache a singleton, overwriting any previous one
    pub fn set_singleton_instance(&self, key: ServiceKey, instance: ServiceInstance) -> Result<()> {
        lock_rwlock_write(&self.tables, "set_singleton_instance")?
            .singletons
            .insert(key, instance);
        Ok(())
    }

    /// Cache a singleton unless one is already cached; returns the cached one
    ///
    /// Two threads racing to build the same singleton both end up with the
    /// instance of whichever stored first.
    pub fn get_or_insert_singleton(
        &self,
        key: &ServiceKey,
        instance: ServiceInstance,
    ) -> Result<ServiceInstance> {
        let mut tables = lock_rwlock_write(&self.tables, "get_or_insert_singleton")?;
        Ok(tables
            .singletons
            .entry(key.clone())
            .or_insert(instance)
            .clone())
    }

    /// Whether a singleton has been built for `key`
    pub fn has_singleton(&self, key: &ServiceKey) -> bool {
        self.read().singletons.contains_key(key)
    }

    /// Number of cached singletons
    pub fn singleton_count(&self) -> usize {
        self.read().singletons.len()
    }

    /// Empty the singleton cache and return its contents, ordered by key
    pub fn drain_singletons(&self) -> Result<Vec<ServiceInstance>> {
        let mut tables = lock_rwlock_write(&self.tables, "drain_singletons")?;
        let mut drained: Vec<ServiceInstance> =
            tables.singletons.drain().map(|(_, instance)| instance).collect();
        drop(tables);
        drained.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(drained)
    }

    /// Reset every table
    pub fn clear_all(&self) -> Result<()> {
        let mut tables = lock_rwlock_write(&self.tables, "clear_all")?;
        *tables = RegistryTables::default();
        debug!("Cleared service registry");
        Ok(())
    }
}

impl RegistryView for ServiceRegistry {
    fn is_registered(&self, key: &ServiceKey) -> bool {
        ServiceRegistry::is_registered(self, key)
    }

    fn get_service_implementation(&self, key: &ServiceKey) -> Option<Implementation> {
        ServiceRegistry::get_service_implementation(self, key)
    }

    fn get_all_registrations(&self) -> BTreeMap<ServiceKey, Implementation> {
        ServiceRegistry::get_all_registrations(self)
    }

    fn contract_for(&self, key: &ServiceKey) -> Option<Contract> {
        ServiceRegistry::contract_for(self, key)
    }

    fn registered_keys(&self) -> Vec<ServiceKey> {
        self.keys()
    }
}

/// Programmer-error guards applied to every descriptor before it is stored
fn check_descriptor(descriptor: &ServiceDescriptor) -> Result<()> {
    let key = descriptor.key();

    match descriptor.binding() {
        Binding::Implementation(implementation) => {
            if implementation.provides().type_id() != key.type_id() {
                return Err(Error::configuration(format!(
                    "{} provides {} and cannot be bound to {key}",
                    implementation.type_name(),
                    implementation.provides()
                )));
            }
            if !implementation.is_constructible() {
                return Err(Error::configuration(format!(
                    "{} is an abstract interface and cannot be registered for {key}",
                    implementation.type_name()
                )));
            }
        }
        Binding::Instance(instance) => {
            if instance.value_type_id() != key.type_id() {
                return Err(Error::configuration(format!(
                    "instance of {} cannot be bound to {key}",
                    instance.type_name()
                )));
            }
            if descriptor.scope() != Scope::Singleton {
                return Err(Error::configuration(format!(
                    "instance binding for {key} must be singleton-scoped, not {}",
                    descriptor.scope()
                )));
            }
        }
        Binding::Factory(_) => {}
    }

    if descriptor.is_lazy() && descriptor.scope() != Scope::Singleton {
        return Err(Error::configuration(format!(
            "lazy registration of {key} requires singleton scope, not {}",
            descriptor.scope()
        )));
    }

    if let Some((type_id, type_name)) = descriptor.cleanup_type() {
        if type_id != key.type_id() {
            return Err(Error::configuration(format!(
                "cleanup hook expects {type_name} but {key} produces a different type"
            )));
        }
    }

    Ok(())
}
