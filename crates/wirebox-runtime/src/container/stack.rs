//! Per-thread resolution stacks
//!
//! Each thread resolving through a container gets its own stack of keys
//! currently under construction. Requesting a key that is already on the
//! calling thread's stack is a cycle.

use crate::utils::{lock_mutex, recover_poisoned};
use std::collections::HashMap;
use std::sync::Mutex;
use std::thread::{self, ThreadId};
use wirebox_domain::{Error, Result, ServiceKey};

#[derive(Debug, Default)]
pub(crate) struct ResolutionStacks {
    stacks: Mutex<HashMap<ThreadId, Vec<ServiceKey>>>,
}

impl ResolutionStacks {
    /// Push `key` for the current thread
    ///
    /// Fails with the cycle path when `key` is already being resolved on
    /// this thread. The returned frame pops the key when dropped.
    pub(crate) fn enter(&self, key: &ServiceKey) -> Result<StackFrame<'_>> {
        let thread = thread::current().id();
        let mut stacks = lock_mutex(&self.stacks, "resolution stack")?;
        let stack = stacks.entry(thread).or_default();

        if let Some(position) = stack.iter().position(|entry| entry == key) {
            let mut path = stack[position..].to_vec();
            path.push(key.clone());
            return Err(Error::circular(path));
        }

        let parent = stack.last().cloned();
        let root = stack.first().cloned();
        stack.push(key.clone());

        Ok(StackFrame {
            stacks: self,
            thread,
            parent,
            root,
        })
    }

    /// Depth of the current thread's stack
    pub(crate) fn depth(&self) -> usize {
        recover_poisoned(self.stacks.lock(), "resolution stack")
            .get(&thread::current().id())
            .map_or(0, Vec::len)
    }

    /// Number of threads with a resolve in flight
    pub(crate) fn active_threads(&self) -> usize {
        recover_poisoned(self.stacks.lock(), "resolution stack").len()
    }
}

/// One key on a thread's stack; popped on drop, including during unwinding
pub(crate) struct StackFrame<'a> {
    stacks: &'a ResolutionStacks,
    thread: ThreadId,
    parent: Option<ServiceKey>,
    root: Option<ServiceKey>,
}

impl StackFrame<'_> {
    /// The key whose construction requested this one
    pub(crate) fn parent(&self) -> Option<&ServiceKey> {
        self.parent.as_ref()
    }

    /// The key the outermost resolve call asked for
    pub(crate) fn root(&self) -> Option<&ServiceKey> {
        self.root.as_ref()
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        let mut stacks = recover_poisoned(self.stacks.stacks.lock(), "resolution stack");
        if let Some(stack) = stacks.get_mut(&self.thread) {
            stack.pop();
            if stack.is_empty() {
                stacks.remove(&self.thread);
            }
        }
    }
}
