//! Unbounded FIFO task queue shared by every worker in a pool.
//!
//! The task list, the shutdown flag and the wake-up condition all live behind
//! one mutex, so a worker never observes a half-updated queue. Once the queue
//! is closed and empty, `dequeue_blocking` returns `None` to every caller.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use tracing::trace;

use crate::errors::{SearchError, SearchResult};

/// A unit of work as stored in the queue
pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<Task>,
    closed: bool,
}

/// Task queue with blocking dequeue and a shutdown flag
#[derive(Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task to the tail and wakes one waiting worker.
    ///
    /// Never blocks on a full queue. Fails with `PoolStopped` once `close`
    /// has been called.
    pub fn enqueue(&self, task: Task) -> SearchResult<()> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(SearchError::PoolStopped);
            }
            state.tasks.push_back(task);
            trace!("Task enqueued, {} pending", state.tasks.len());
        }
        self.available.notify_one();
        Ok(())
    }

    /// Removes the head of the queue, waiting while the queue is empty and
    /// still open. Returns `None` once the queue is closed and drained.
    pub fn dequeue_blocking(&self) -> Option<Task> {
        let mut state = self.state.lock();
        loop {
            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Signals shutdown and wakes every waiting worker. Tasks already queued
    /// are still handed out.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
