//! Container statistics

use serde::Serialize;
use std::fmt;

/// Point-in-time counters for a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStats {
    /// Registered keys
    pub registrations: usize,
    /// Singletons built so far
    pub singletons_cached: usize,
    /// Open request/session buckets
    pub open_scopes: usize,
    /// Records in the resolution history
    pub resolutions_recorded: usize,
    /// Keys cached as valid by the validation engine
    pub validated_keys: usize,
    /// Resolution strategies, in the order they are tried
    pub strategies: Vec<&'static str>,
}

impl fmt::Display for ContainerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} registration(s), {} cached singleton(s), {} open scope(s), {} recorded resolution(s)",
            self.registrations, self.singletons_cached, self.open_scopes, self.resolutions_recorded
        )
    }
}
