//! Service key value object

use serde::{Serialize, Serializer};
use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque identifier for a requested capability
///
/// A key is the identity of a type (usually a trait object such as
/// `dyn Logger`) optionally narrowed by a qualifier so that several
/// bindings of the same type can coexist.
///
/// # Example
///
/// ```
/// use wirebox_domain::ServiceKey;
///
/// trait Logger: Send + Sync {}
///
/// let key = ServiceKey::of::<dyn Logger>();
/// assert_eq!(key.to_string(), "dyn Logger");
/// assert_ne!(key, ServiceKey::named::<dyn Logger>("audit"));
/// ```
#[derive(Clone)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
    qualifier: Option<String>,
}

impl ServiceKey {
    /// Key for the type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            qualifier: None,
        }
    }

    /// Key for the type `T` narrowed by a qualifier
    pub fn named<T: ?Sized + 'static>(qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            ..Self::of::<T>()
        }
    }

    /// The same type identity with a different qualifier
    pub fn with_qualifier(&self, qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            ..self.clone()
        }
    }

    /// Type identity of the key
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name as reported by the compiler
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Optional qualifier
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// True when the key identifies the type `T`, regardless of qualifier
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Type name with every module path stripped
    pub fn short_name(&self) -> String {
        short_type_name(self.type_name)
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.qualifier == other.qualifier
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.qualifier.hash(state);
    }
}

impl Ord for ServiceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_name
            .cmp(other.type_name)
            .then_with(|| self.qualifier.cmp(&other.qualifier))
            .then_with(|| self.type_id.cmp(&other.type_id))
    }
}

impl PartialOrd for ServiceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}[{}]", self.short_name(), qualifier),
            None => write!(f, "{}", self.short_name()),
        }
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKey({self})")
    }
}

impl Serialize for ServiceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Strip module paths from every path segment of a type name
///
/// `alloc::sync::Arc<dyn app::Logger>` becomes `Arc<dyn Logger>`.
pub fn short_type_name(full: &str) -> String {
    let mut output = String::with_capacity(full.len());
    let mut segment = String::new();

    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
            continue;
        }
        push_last_segment(&mut output, &segment);
        segment.clear();
        output.push(ch);
    }
    push_last_segment(&mut output, &segment);
    output
}

fn push_last_segment(output: &mut String, segment: &str) {
    output.push_str(segment.rsplit("::").next().unwrap_or(segment));
}
