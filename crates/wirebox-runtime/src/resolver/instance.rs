use super::ResolutionStrategy;
use crate::constants::INSTANCE_STRATEGY;
use crate::registry::ServiceRegistry;
use wirebox_domain::{
    Binding, Result, Scope, ServiceDescriptor, ServiceInstance, ServiceKey, ServiceResolver,
};

/// Returns an already-built instance unchanged
///
/// Checks the singleton cache first, then explicit instance bindings.
pub struct InstanceStrategy;

impl ResolutionStrategy for InstanceStrategy {
    fn name(&self) -> &'static str {
        INSTANCE_STRATEGY
    }

    fn resolve(
        &self,
        key: &ServiceKey,
        descriptor: &ServiceDescriptor,
        registry: &ServiceRegistry,
        _resolver: &dyn ServiceResolver,
    ) -> Result<Option<ServiceInstance>> {
        if descriptor.scope() == Scope::Singleton {
            if let Some(cached) = registry.get_singleton_instance(key) {
                return Ok(Some(cached));
            }
        }
        match descriptor.binding() {
            Binding::Instance(instance) => Ok(Some(instance.clone())),
            Binding::Implementation(_) | Binding::Factory(_) => Ok(None),
        }
    }
}
