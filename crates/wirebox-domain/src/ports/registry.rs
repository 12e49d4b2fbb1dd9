//! Registry view port

use crate::registration::{Contract, Implementation};
use crate::value_objects::ServiceKey;
use std::collections::BTreeMap;

/// Read access to registrations, as consumed by the validator
pub trait RegistryView: Send + Sync {
    /// Whether `key` has any binding
    fn is_registered(&self, key: &ServiceKey) -> bool;

    /// The implementation bound to `key`, for constructor bindings only
    fn get_service_implementation(&self, key: &ServiceKey) -> Option<Implementation>;

    /// Every constructor binding, ordered by key
    fn get_all_registrations(&self) -> BTreeMap<ServiceKey, Implementation>;

    /// Contract declared for a capability key
    fn contract_for(&self, key: &ServiceKey) -> Option<Contract>;

    /// Every registered key regardless of binding kind, sorted
    fn registered_keys(&self) -> Vec<ServiceKey>;
}
