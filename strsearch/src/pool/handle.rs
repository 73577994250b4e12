//! One-shot result cells connecting a submitted task to its submitter.
//!
//! `channel()` creates a [`Completer`] for the worker side and a
//! [`TaskHandle`] for the submitter. The completer writes exactly once; if it
//! is dropped without writing, the handle resolves to `TaskCancelled` so a
//! waiting submitter can never block forever.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

use crate::errors::{SearchError, SearchResult};

struct Slot<T> {
    outcome: Mutex<Option<SearchResult<T>>>,
    ready: Condvar,
}

impl<T> Slot<T> {
    fn fill(&self, outcome: SearchResult<T>) {
        let mut guard = self.outcome.lock();
        if guard.is_none() {
            *guard = Some(outcome);
        }
        drop(guard);
        self.ready.notify_all();
    }
}

/// Creates a connected completer/handle pair
pub fn channel<T>() -> (Completer<T>, TaskHandle<T>) {
    let slot = Arc::new(Slot {
        outcome: Mutex::new(None),
        ready: Condvar::new(),
    });
    (
        Completer {
            slot: Some(Arc::clone(&slot)),
        },
        TaskHandle { slot },
    )
}

/// Producer side of a task result
pub struct Completer<T> {
    slot: Option<Arc<Slot<T>>>,
}

impl<T> Completer<T> {
    /// Stores the task's outcome and wakes the waiting submitter
    pub fn complete(mut self, outcome: SearchResult<T>) {
        if let Some(slot) = self.slot.take() {
            slot.fill(outcome);
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.fill(Err(SearchError::TaskCancelled));
        }
    }
}

/// Handle to the eventual outcome of a submitted task
pub struct TaskHandle<T> {
    slot: Arc<Slot<T>>,
}

impl<T> TaskHandle<T> {
    /// Returns true once the task has produced its outcome
    pub fn is_ready(&self) -> bool {
        self.slot.outcome.lock().is_some()
    }

    /// Blocks until the task has produced its outcome
    pub fn wait(&self) {
        let mut guard = self.slot.outcome.lock();
        while guard.is_none() {
            self.slot.ready.wait(&mut guard);
        }
    }

    /// Blocks until the task has run, then returns its value or failure
    pub fn join(self) -> SearchResult<T> {
        let mut guard = self.slot.outcome.lock();
        loop {
            if let Some(outcome) = guard.take() {
                return outcome;
            }
            self.slot.ready.wait(&mut guard);
        }
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}
