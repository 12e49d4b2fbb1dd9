//! Capability contracts

use crate::ports::Capability;
use crate::value_objects::ServiceKey;
use serde::Serialize;

/// The members an implementation must expose to satisfy a capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    capability: ServiceKey,
    required_members: Vec<&'static str>,
}

impl Contract {
    /// Contract with an explicit member list
    pub fn new(capability: ServiceKey, required_members: &[&'static str]) -> Self {
        Self {
            capability,
            required_members: required_members.to_vec(),
        }
    }

    /// Contract declared by a [`Capability`] impl
    pub fn of<I: ?Sized + Capability + 'static>() -> Self {
        Self::new(ServiceKey::of::<I>(), I::REQUIRED_MEMBERS)
    }

    /// The capability key
    pub fn capability(&self) -> &ServiceKey {
        &self.capability
    }

    /// Members every implementation must expose
    pub fn required_members(&self) -> &[&'static str] {
        &self.required_members
    }

    /// Members from this contract absent from `members`, in declaration order
    pub fn missing_members(&self, members: &[&'static str]) -> Vec<String> {
        self.required_members
            .iter()
            .filter(|required| !members.contains(required))
            .map(|required| (*required).to_string())
            .collect()
    }
}
