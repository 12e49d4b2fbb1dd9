//! Lifecycle and capability contracts

use crate::constants::DISPOSE_MEMBER;
use crate::error::Result;

/// A service that releases resources when its scope ends
pub trait Disposable: Send + Sync {
    /// Release resources; called at most once per instance
    fn dispose(&self) -> Result<()>;
}

/// Declares the members an implementation of a capability must expose
///
/// Implement it for the trait object type:
///
/// ```
/// use wirebox_domain::Capability;
///
/// trait Logger: Send + Sync {
///     fn log(&self, message: &str);
/// }
///
/// impl Capability for dyn Logger {
///     const REQUIRED_MEMBERS: &'static [&'static str] = &["log"];
/// }
///
/// assert_eq!(<dyn Logger as Capability>::REQUIRED_MEMBERS, &["log"]);
/// ```
pub trait Capability {
    /// Members every implementation must declare
    const REQUIRED_MEMBERS: &'static [&'static str];
}

impl Capability for dyn Disposable {
    const REQUIRED_MEMBERS: &'static [&'static str] = &[DISPOSE_MEMBER];
}
