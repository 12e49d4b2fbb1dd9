//! Shared runtime utilities

pub mod locks;
pub mod timing;

pub use locks::{lock_mutex, lock_rwlock_read, lock_rwlock_write, recover_poisoned};
pub use timing::TimedOperation;
