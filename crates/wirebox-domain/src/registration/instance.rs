//! Type-erased service instances

use crate::error::{Error, Result};
use crate::value_objects::ServiceKey;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cleanup callback run when an instance is disposed
pub type CleanupHook = Arc<dyn Fn(&ServiceInstance) -> Result<()> + Send + Sync>;

/// A fully constructed service, erased to `Any`
///
/// The erased value is always an `Arc<T>` so that `T` may be a trait object.
/// Clones share the same value and the same disposal flag.
#[derive(Clone)]
pub struct ServiceInstance {
    key: ServiceKey,
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
    cleanup: Option<CleanupHook>,
    disposed: Arc<AtomicBool>,
}

impl ServiceInstance {
    /// Wrap a typed value
    pub fn new<T: ?Sized + Send + Sync + 'static>(key: ServiceKey, value: Arc<T>) -> Self {
        Self {
            key,
            value: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            cleanup: None,
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The key this instance was produced for
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// Type identity of the wrapped value
    pub fn value_type_id(&self) -> TypeId {
        self.type_id
    }

    /// Type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recover the typed value
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Recover the typed value or report a type mismatch
    pub fn downcast_or_err<T: ?Sized + 'static>(&self) -> Result<Arc<T>> {
        self.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
            key: self.key.clone(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Whether both handles point at the same underlying value
    pub fn same_instance(&self, other: &ServiceInstance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    /// Same value, re-keyed (used when a binding is registered under a qualified key)
    pub fn with_key(mut self, key: ServiceKey) -> Self {
        self.key = key;
        self
    }

    /// Attach a cleanup hook
    pub fn with_cleanup(mut self, hook: CleanupHook) -> Self {
        self.cleanup = Some(hook);
        self
    }

    /// Whether a cleanup hook is attached
    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Whether the cleanup hook already ran
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Run the cleanup hook at most once
    ///
    /// Returns `None` when there is no hook or it already ran.
    pub fn run_cleanup(&self) -> Option<Result<()>> {
        let hook = self.cleanup.as_ref()?;
        if self.disposed.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(hook(self))
    }
}

impl fmt::Debug for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("key", &self.key)
            .field("type_name", &self.type_name)
            .field("has_cleanup", &self.cleanup.is_some())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
