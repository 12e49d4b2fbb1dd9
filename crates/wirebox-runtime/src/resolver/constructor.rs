use super::ResolutionStrategy;
use crate::constants::CONSTRUCTOR_STRATEGY;
use crate::registry::ServiceRegistry;
use tracing::debug;
use wirebox_domain::{
    Arguments, Binding, Result, ServiceDescriptor, ServiceInstance, ServiceKey, ServiceResolver,
};
use wirebox_validate::constructor_dependencies;

/// Builds an implementation through its declared constructor
///
/// Required dependencies are resolved through the calling resolver.
/// Defaulted dependencies are injected only when registered; primitive
/// parameters are never touched and are left to the constructor.
pub struct ConstructorStrategy;

impl ResolutionStrategy for ConstructorStrategy {
    fn name(&self) -> &'static str {
        CONSTRUCTOR_STRATEGY
    }

    fn resolve(
        &self,
        key: &ServiceKey,
        descriptor: &ServiceDescriptor,
        _registry: &ServiceRegistry,
        resolver: &dyn ServiceResolver,
    ) -> Result<Option<ServiceInstance>> {
        let Binding::Implementation(implementation) = descriptor.binding() else {
            return Ok(None);
        };
        if !implementation.is_constructible() {
            return Ok(None);
        }

        let mut args = Arguments::new(key.clone());
        for dependency in constructor_dependencies(implementation) {
            if !dependency.required && !resolver.contains(&dependency.key) {
                continue;
            }
            let instance = resolver.resolve_instance(&dependency.key)?;
            args.insert(dependency.parameter, instance);
        }

        debug!(
            key = %key,
            implementation = implementation.type_name(),
            arguments = args.len(),
            "Constructing service"
        );
        implementation.instantiate(key, &args).map(Some)
    }
}
