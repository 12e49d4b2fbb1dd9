use super::ResolutionStrategy;
use crate::constants::FACTORY_STRATEGY;
use crate::registry::ServiceRegistry;
use tracing::debug;
use wirebox_domain::{Binding, Result, ServiceDescriptor, ServiceInstance, ServiceKey, ServiceResolver};

/// Invokes a registered factory with the calling resolver
pub struct FactoryStrategy;

impl ResolutionStrategy for FactoryStrategy {
    fn name(&self) -> &'static str {
        FACTORY_STRATEGY
    }

    fn resolve(
        &self,
        key: &ServiceKey,
        descriptor: &ServiceDescriptor,
        _registry: &ServiceRegistry,
        resolver: &dyn ServiceResolver,
    ) -> Result<Option<ServiceInstance>> {
        let Binding::Factory(factory) = descriptor.binding() else {
            return Ok(None);
        };
        debug!(key = %key, "Invoking factory");
        factory(key, resolver).map(|instance| Some(instance.with_key(key.clone())))
    }
}
