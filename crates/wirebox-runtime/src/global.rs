//! Process-wide container
//!
//! A convenience for application bootstrap. Library code should take a
//! `&Container` or `Arc<Container>` as a parameter instead of reaching for
//! the global.

use crate::container::Container;
use crate::utils::{lock_rwlock_read, lock_rwlock_write, recover_poisoned};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use wirebox_domain::{Error, Result};

static GLOBAL_CONTAINER: RwLock<Option<Arc<Container>>> = RwLock::new(None);

/// The global container, created with default configuration on first access
pub fn get_container() -> Result<Arc<Container>> {
    if let Some(container) = lock_rwlock_read(&GLOBAL_CONTAINER, "global container")?.as_ref() {
        return Ok(Arc::clone(container));
    }

    let mut slot = lock_rwlock_write(&GLOBAL_CONTAINER, "global container")?;
    let container = slot.get_or_insert_with(|| {
        debug!("Initializing default global container");
        Arc::new(Container::new())
    });
    Ok(Arc::clone(container))
}

/// The global container if one has been set or created
pub fn try_get_container() -> Option<Arc<Container>> {
    recover_poisoned(GLOBAL_CONTAINER.read(), "global container").clone()
}

/// Install `container` as the global container
///
/// Fails with `AlreadyInitialized` when a container is already installed,
/// unless `force` is set.
pub fn set_container(container: Arc<Container>, force: bool) -> Result<()> {
    let mut slot = lock_rwlock_write(&GLOBAL_CONTAINER, "global container")?;
    if slot.is_some() && !force {
        return Err(Error::AlreadyInitialized);
    }
    let replaced = slot.replace(container).is_some();
    info!(replaced, "Global container installed");
    Ok(())
}

/// Drop the global reference
///
/// Containers still held elsewhere keep their registrations.
pub fn reset_container() {
    let mut slot = recover_poisoned(GLOBAL_CONTAINER.write(), "global container");
    if slot.take().is_some() {
        debug!("Global container reset");
    }
}
