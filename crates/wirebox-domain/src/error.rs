//! Error handling types

use crate::constants::PATH_SEPARATOR;
use crate::value_objects::{Scope, ServiceKey};
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wirebox container
#[derive(Error, Debug)]
pub enum Error {
    /// A registration call was given an invalid binding
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A key was registered twice without going through the replace path
    #[error("Service {key} is already registered; use replace() to overwrite it")]
    AlreadyRegistered {
        /// The key that already has a descriptor
        key: ServiceKey,
    },

    /// An implementation does not expose every member its capability requires
    #[error(
        "Contract violation: {implementation} does not satisfy {capability}, missing member(s): {}",
        .missing.join(", ")
    )]
    ContractViolation {
        /// The capability (interface) key
        capability: ServiceKey,
        /// Type name of the offending implementation
        implementation: String,
        /// Every required member the implementation lacks
        missing: Vec<String>,
    },

    /// A requested key, or one of its transitive dependencies, has no registration
    #[error("{}", format_unresolved(.key, .requested_by.as_ref(), .root.as_ref(), .known))]
    UnresolvedDependency {
        /// The key that could not be resolved
        key: ServiceKey,
        /// The service whose construction needed `key`, if any
        requested_by: Option<ServiceKey>,
        /// The key the caller originally asked for, if different from `key`
        root: Option<ServiceKey>,
        /// Every key registered at the time of failure (sorted)
        known: Vec<ServiceKey>,
    },

    /// A dependency cycle was found, statically or during a live resolve
    #[error("Circular dependency detected: {}", format_path(.path))]
    CircularDependency {
        /// Ordered cycle path; the first key is repeated at the end
        path: Vec<ServiceKey>,
    },

    /// A request- or session-scoped service was resolved outside a matching scope
    #[error("Service {key} is {scope}-scoped but no {scope} scope is active")]
    ScopeNotActive {
        /// The scoped service key
        key: ServiceKey,
        /// The scope the service requires
        scope: Scope,
    },

    /// A resolver referenced a scope bucket that was never created
    #[error("Scope '{scope_id}' does not exist")]
    ScopeNotFound {
        /// The unknown scope identifier
        scope_id: String,
    },

    /// A resolved instance could not be downcast to the requested type
    #[error("Service {key} does not hold a value of type {expected}")]
    TypeMismatch {
        /// The key that was resolved
        key: ServiceKey,
        /// The requested type name
        expected: &'static str,
    },

    /// A constructor or factory reported failure
    #[error("Failed to construct {key}: {message}")]
    Construction {
        /// The service being constructed
        key: ServiceKey,
        /// Description of the failure
        message: String,
    },

    /// An aggregated validation pass found one or more problems
    #[error("Validation failed with {} error(s): {}", .failures.len(), format_failures(.failures))]
    ValidationFailed {
        /// Every failure found during the pass
        failures: Vec<Error>,
    },

    /// The process-wide container was already initialized
    #[error("Global container is already initialized; pass force=true to replace it")]
    AlreadyInitialized,

    /// A cleanup hook failed during disposal
    #[error("Cleanup of {key} failed: {message}")]
    Cleanup {
        /// The service whose hook failed
        key: ServiceKey,
        /// Description of the failure
        message: String,
    },

    /// I/O error while reading or writing configuration
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },
}

// Basic error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create a construction error
    pub fn construction<S: Into<String>>(key: ServiceKey, message: S) -> Self {
        Self::Construction {
            key,
            message: message.into(),
        }
    }

    /// Create a circular dependency error from an ordered path
    pub fn circular(path: Vec<ServiceKey>) -> Self {
        Self::CircularDependency { path }
    }
}

// Classification helpers
impl Error {
    /// True for errors raised while a binding is being registered
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::AlreadyRegistered { .. } | Self::ContractViolation { .. }
        )
    }

    /// The cycle path, when this is a circular dependency error
    pub fn cycle_path(&self) -> Option<&[ServiceKey]> {
        match self {
            Self::CircularDependency { path } => Some(path),
            _ => None,
        }
    }
}

fn format_path(path: &[ServiceKey]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

fn format_failures(failures: &[Error]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_unresolved(
    key: &ServiceKey,
    requested_by: Option<&ServiceKey>,
    root: Option<&ServiceKey>,
    known: &[ServiceKey],
) -> String {
    let mut message = format!("Service {key} is not registered");
    if let Some(parent) = requested_by {
        message.push_str(&format!(" (required by {parent}"));
        match root {
            Some(root) if root != parent => message.push_str(&format!(" while resolving {root})")),
            _ => message.push(')'),
        }
    }
    if known.is_empty() {
        message.push_str("; no services are registered");
    } else {
        message.push_str(&format!("; known services: {}", format_known(known)));
    }
    message
}

fn format_known(known: &[ServiceKey]) -> String {
    known
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
