//! Lock helpers
//!
//! Poisoned locks are reported as `Error::Internal` instead of panicking.

use std::sync::{LockResult, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;
use wirebox_domain::{Error, Result};

/// Lock a RwLock for reading and handle poisoning
pub fn lock_rwlock_read<'a, T>(lock: &'a RwLock<T>, context: &str) -> Result<RwLockReadGuard<'a, T>> {
    lock.read()
        .map_err(|_| Error::internal(format!("RwLock read lock poisoned: {context}")))
}

/// Lock a RwLock for writing and handle poisoning
pub fn lock_rwlock_write<'a, T>(
    lock: &'a RwLock<T>,
    context: &str,
) -> Result<RwLockWriteGuard<'a, T>> {
    lock.write()
        .map_err(|_| Error::internal(format!("RwLock write lock poisoned: {context}")))
}

/// Lock a Mutex and handle poisoning
pub fn lock_mutex<'a, T>(lock: &'a Mutex<T>, context: &str) -> Result<MutexGuard<'a, T>> {
    lock.lock()
        .map_err(|_| Error::internal(format!("Mutex poisoned: {context}")))
}

/// Take the guard even if a previous holder panicked
///
/// For read paths and cleanup paths that must not fail. The tables behind
/// these locks are only ever mutated by single map operations, so a
/// poisoned guard still sees consistent data.
pub fn recover_poisoned<G>(result: LockResult<G>, context: &str) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!(context, "Recovering poisoned lock");
        poisoned.into_inner()
    })
}
