//! Lifetime scopes and scope identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifetime policy of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scope {
    /// One instance for the lifetime of the container
    #[default]
    Singleton,
    /// A new instance on every resolve; never cached
    Transient,
    /// One instance per request scope bucket
    Request,
    /// One instance per session scope bucket
    Session,
}

impl Scope {
    /// All scopes in declaration order
    pub const ALL: [Scope; 4] = [Self::Singleton, Self::Transient, Self::Request, Self::Session];

    /// Whether resolved instances are cached somewhere
    pub fn is_cached(self) -> bool {
        !matches!(self, Self::Transient)
    }

    /// Whether instances live in a caller-managed scope bucket
    pub fn is_bucketed(self) -> bool {
        matches!(self, Self::Request | Self::Session)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton => write!(f, "singleton"),
            Self::Transient => write!(f, "transient"),
            Self::Request => write!(f, "request"),
            Self::Session => write!(f, "session"),
        }
    }
}

/// Caller-supplied identifier of a scope bucket (e.g. `"request-42"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    /// Create a scope identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ScopeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ScopeId> for ScopeId {
    fn from(id: &ScopeId) -> Self {
        id.clone()
    }
}

/// The scope buckets a single resolution tree may cache into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeContext {
    /// Bucket for request-scoped services
    pub request: Option<ScopeId>,
    /// Bucket for session-scoped services
    pub session: Option<ScopeId>,
}

impl ScopeContext {
    /// Context with no active buckets
    pub fn root() -> Self {
        Self::default()
    }

    /// Set the request bucket
    pub fn with_request(mut self, id: impl Into<ScopeId>) -> Self {
        self.request = Some(id.into());
        self
    }

    /// Set the session bucket
    pub fn with_session(mut self, id: impl Into<ScopeId>) -> Self {
        self.session = Some(id.into());
        self
    }

    /// The bucket that caches instances of the given scope, if any
    pub fn bucket_for(&self, scope: Scope) -> Option<&ScopeId> {
        match scope {
            Scope::Request => self.request.as_ref(),
            Scope::Session => self.session.as_ref(),
            Scope::Singleton | Scope::Transient => None,
        }
    }
}
