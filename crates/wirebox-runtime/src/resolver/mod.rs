//! Resolution strategies
//!
//! The chain tries each strategy in a fixed order and returns the first
//! instance produced:
//!
//! 1. [`InstanceStrategy`] - cached singleton or registered instance
//! 2. [`FactoryStrategy`] - user factory, given the calling resolver
//! 3. [`ConstructorStrategy`] - declared constructor with injected arguments
//!
//! Strategies never cache; the container applies scope caching afterwards.

mod constructor;
mod factory;
mod instance;

pub use constructor::ConstructorStrategy;
pub use factory::FactoryStrategy;
pub use instance::InstanceStrategy;

use crate::registry::ServiceRegistry;
use tracing::trace;
use wirebox_domain::{Result, ServiceDescriptor, ServiceInstance, ServiceKey, ServiceResolver};

/// One way of producing an instance for a key
pub trait ResolutionStrategy: Send + Sync {
    /// Strategy name used in logs and diagnostics
    fn name(&self) -> &'static str;

    /// Produce an instance, or `None` if this strategy does not apply
    ///
    /// `resolver` is the resolver of the calling resolution tree, so nested
    /// resolves share its scope context and cycle guard.
    fn resolve(
        &self,
        key: &ServiceKey,
        descriptor: &ServiceDescriptor,
        registry: &ServiceRegistry,
        resolver: &dyn ServiceResolver,
    ) -> Result<Option<ServiceInstance>>;
}

/// Ordered list of strategies
pub struct ResolverChain {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverChain {
    /// Chain with the standard strategies in standard order
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(InstanceStrategy),
            Box::new(FactoryStrategy),
            Box::new(ConstructorStrategy),
        ])
    }

    /// Chain with custom strategies, tried in the given order
    pub fn with_strategies(strategies: Vec<Box<dyn ResolutionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Strategy names in order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    /// First instance any strategy produces, or `None` if `key` has no
    /// descriptor or no strategy applies
    pub fn resolve(
        &self,
        key: &ServiceKey,
        registry: &ServiceRegistry,
        resolver: &dyn ServiceResolver,
    ) -> Result<Option<ServiceInstance>> {
        let Some(descriptor) = registry.get_descriptor(key) else {
            return Ok(None);
        };

        for strategy in &self.strategies {
            if let Some(instance) = strategy.resolve(key, &descriptor, registry, resolver)? {
                trace!(key = %key, strategy = strategy.name(), "Strategy produced instance");
                return Ok(Some(instance));
            }
        }
        Ok(None)
    }
}
