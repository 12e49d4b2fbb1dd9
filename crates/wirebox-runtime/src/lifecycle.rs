//! Scope lifetimes and cleanup
//!
//! Request and session instances live in scope buckets keyed by a
//! caller-supplied [`ScopeId`]. Disposing a bucket runs every cleanup hook
//! it holds; a failing or panicking hook is logged and counted, and the
//! remaining hooks still run.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, info, warn};
use wirebox_domain::{CleanupHook, Error, Result, ScopeId, ServiceInstance, ServiceKey};

/// Instances cached for one scope id
#[derive(Debug)]
pub struct ScopeBucket {
    instances: HashMap<ServiceKey, ServiceInstance>,
    created_at: DateTime<Utc>,
}

impl ScopeBucket {
    fn new() -> Self {
        Self {
            instances: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Number of cached instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when nothing is cached yet
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// When the scope was opened
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Open scope as shown in diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    /// Scope identifier
    pub scope_id: ScopeId,
    /// Number of cached instances
    pub instances: usize,
    /// When the scope was opened
    pub created_at: DateTime<Utc>,
}

/// What a disposal did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisposalReport {
    /// Disposed scope; `None` for the singleton cache
    pub scope_id: Option<ScopeId>,
    /// Instances released
    pub instances: usize,
    /// Cleanup hooks that completed
    pub cleaned: usize,
    /// Cleanup hooks that failed or panicked
    pub failed: usize,
    /// Failure messages, one per failed hook
    pub errors: Vec<String>,
}

impl DisposalReport {
    fn for_scope(scope_id: Option<ScopeId>) -> Self {
        Self {
            scope_id,
            ..Self::default()
        }
    }

    /// True when every hook completed
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Owner of scope buckets and cleanup sequencing
#[derive(Debug, Default)]
pub struct LifecycleManager {
    scopes: DashMap<ScopeId, ScopeBucket>,
}

impl LifecycleManager {
    /// Create a manager with no open scopes
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the binding's cleanup hook to a freshly built instance
    ///
    /// Instances that already carry a hook (cached ones) are returned as is.
    pub fn create_with_lifecycle(
        &self,
        instance: ServiceInstance,
        hook: Option<&CleanupHook>,
    ) -> ServiceInstance {
        match hook {
            Some(hook) if !instance.has_cleanup() => instance.with_cleanup(hook.clone()),
            _ => instance,
        }
    }

    /// Open an empty bucket; returns false if it was already open
    pub fn create_scope(&self, scope_id: impl Into<ScopeId>) -> bool {
        let scope_id = scope_id.into();
        let mut created = false;
        self.scopes.entry(scope_id.clone()).or_insert_with(|| {
            created = true;
            ScopeBucket::new()
        });
        if created {
            info!(scope = %scope_id, "Scope created");
        } else {
            debug!(scope = %scope_id, "Scope already open");
        }
        created
    }

    /// Whether a bucket is open
    pub fn has_scope(&self, scope_id: &ScopeId) -> bool {
        self.scopes.contains_key(scope_id)
    }

    /// Instance cached in a bucket
    pub fn get_scoped(&self, scope_id: &ScopeId, key: &ServiceKey) -> Option<ServiceInstance> {
        self.scopes
            .get(scope_id)
            .and_then(|bucket| bucket.instances.get(key).cloned())
    }

    /// Cache an instance in a bucket unless one is already cached; returns the cached one
    pub fn store_scoped(&self, scope_id: &ScopeId, instance: ServiceInstance) -> Result<ServiceInstance> {
        let mut bucket = self
            .scopes
            .get_mut(scope_id)
            .ok_or_else(|| Error::ScopeNotFound {
                scope_id: scope_id.to_string(),
            })?;
        let key = instance.key().clone();
        Ok(bucket.instances.entry(key).or_insert(instance).clone())
    }

    /// Remove a bucket and run its cleanup hooks
    ///
    /// Unknown or already disposed ids yield an empty report.
    pub fn dispose_scope(&self, scope_id: &ScopeId) -> DisposalReport {
        let Some((removed_id, bucket)) = self.scopes.remove(scope_id) else {
            debug!(scope = %scope_id, "Dispose of unknown scope ignored");
            return DisposalReport::for_scope(Some(scope_id.clone()));
        };

        let mut instances: Vec<ServiceInstance> = bucket.instances.into_values().collect();
        instances.sort_by(|a, b| a.key().cmp(b.key()));
        let report = run_cleanups(Some(removed_id), &instances);
        info!(
            scope = ?report.scope_id,
            instances = report.instances,
            cleaned = report.cleaned,
            failed = report.failed,
            "Scope disposed"
        );
        report
    }

    /// Dispose every open scope, then clean up the given singletons
    pub fn cleanup_all(&self, singletons: &[ServiceInstance]) -> Vec<DisposalReport> {
        let mut reports: Vec<DisposalReport> = self
            .open_scopes()
            .iter()
            .map(|scope_id| self.dispose_scope(scope_id))
            .collect();

        let singleton_report = self.cleanup_instances(singletons);
        info!(
            instances = singleton_report.instances,
            cleaned = singleton_report.cleaned,
            failed = singleton_report.failed,
            "Singletons cleaned up"
        );
        reports.push(singleton_report);
        reports
    }

    /// Run the cleanup hooks of instances that live outside any scope bucket
    pub fn cleanup_instances(&self, instances: &[ServiceInstance]) -> DisposalReport {
        run_cleanups(None, instances)
    }

    /// Open scope ids, sorted
    pub fn open_scopes(&self) -> Vec<ScopeId> {
        let mut ids: Vec<ScopeId> = self.scopes.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Open scopes with their sizes, sorted by id
    pub fn scope_summaries(&self) -> Vec<ScopeSummary> {
        let mut summaries: Vec<ScopeSummary> = self
            .scopes
            .iter()
            .map(|entry| ScopeSummary {
                scope_id: entry.key().clone(),
                instances: entry.value().len(),
                created_at: entry.value().created_at(),
            })
            .collect();
        summaries.sort_by(|a, b| a.scope_id.cmp(&b.scope_id));
        summaries
    }
}

fn run_cleanups(scope_id: Option<ScopeId>, instances: &[ServiceInstance]) -> DisposalReport {
    let mut report = DisposalReport::for_scope(scope_id);
    report.instances = instances.len();

    for instance in instances {
        match catch_unwind(AssertUnwindSafe(|| instance.run_cleanup())) {
            Ok(None) => {}
            Ok(Some(Ok(()))) => report.cleaned += 1,
            Ok(Some(Err(err))) => {
                let error = Error::Cleanup {
                    key: instance.key().clone(),
                    message: err.to_string(),
                };
                warn!(key = %instance.key(), error = %err, "Cleanup hook failed");
                report.failed += 1;
                report.errors.push(error.to_string());
            }
            Err(panic) => {
                let error = Error::Cleanup {
                    key: instance.key().clone(),
                    message: format!("hook panicked: {}", panic_message(panic.as_ref())),
                };
                warn!(key = %instance.key(), "Cleanup hook panicked");
                report.failed += 1;
                report.errors.push(error.to_string());
            }
        }
    }
    report
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
