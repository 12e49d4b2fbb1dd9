//! Structural checks on a single binding

use tracing::debug;
use wirebox_domain::{Contract, Error, Implementation, RegistryView, Result, ServiceKey};

/// Check that an implementation exposes every member a capability requires
///
/// All missing members are reported at once.
pub fn validate_protocol_implementation(
    contract: &Contract,
    implementation: &Implementation,
) -> Result<()> {
    let missing = contract.missing_members(implementation.members());
    if missing.is_empty() {
        return Ok(());
    }
    Err(Error::ContractViolation {
        capability: contract.capability().clone(),
        implementation: implementation.type_name().to_string(),
        missing,
    })
}

/// Check that an implementation can be bound to `key`
///
/// The implementation must be constructible and, when the registry declares
/// a contract for `key`, must satisfy it.
pub fn validate_registration(
    key: &ServiceKey,
    implementation: &Implementation,
    registry: &dyn RegistryView,
) -> Result<()> {
    if !implementation.is_constructible() {
        return Err(Error::configuration(format!(
            "{} is an abstract interface and cannot be bound to {key}",
            implementation.type_name()
        )));
    }

    if let Some(contract) = registry.contract_for(key) {
        debug!(key = %key, implementation = implementation.type_name(), "Checking capability contract");
        validate_protocol_implementation(&contract, implementation)?;
    }
    Ok(())
}
