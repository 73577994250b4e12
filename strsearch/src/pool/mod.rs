//! A fixed-size worker pool with one-shot result handles.
//!
//! The pool owns a single [`TaskQueue`] and a fixed set of [`Worker`] threads
//! that are created together in [`WorkerPool::new`] and torn down together in
//! [`WorkerPool::shutdown`].
//!
//! ```rust,ignore
//! let mut pool = WorkerPool::new(NonZeroUsize::new(4).unwrap())?;
//! let handle = pool.submit(|| Ok(2 + 2))?;
//! assert_eq!(handle.join()?, 4);
//! pool.shutdown()?;
//! ```
//!
//! # Shutdown policy
//!
//! Shutdown drains the queue: tasks submitted before `shutdown` still run
//! before the workers exit, so every handle handed out resolves. Submitting
//! after shutdown fails with `PoolStopped`.
//!
//! # Failures
//!
//! Each task returns `SearchResult<T>`. A task that returns an error or
//! panics resolves its handle with that error (`TaskPanicked` for panics);
//! the worker that ran it keeps serving the queue.

pub mod handle;
pub mod queue;
pub mod worker;

pub use handle::TaskHandle;
pub use queue::{Task, TaskQueue};
pub use worker::Worker;

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

use crate::errors::{SearchError, SearchResult};
use crate::metrics::PoolMetrics;

/// Fixed-size pool of worker threads sharing one task queue
pub struct WorkerPool {
    queue: Arc<TaskQueue>,
    workers: Vec<Worker>,
    thread_count: usize,
    metrics: PoolMetrics,
}

impl WorkerPool {
    /// Starts `threads` workers blocked on an empty queue
    pub fn new(threads: NonZeroUsize) -> SearchResult<Self> {
        let thread_count = threads.get();
        let queue = Arc::new(TaskQueue::new());
        let metrics = PoolMetrics::new();
        let mut workers = Vec::with_capacity(thread_count);

        for id in 0..thread_count {
            match Worker::spawn(id, Arc::clone(&queue), metrics.clone()) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    error!("Failed to spawn worker {}: {}", id, e);
                    queue.close();
                    for worker in &mut workers {
                        // The spawn error is the one worth reporting
                        let _ = worker.join();
                    }
                    return Err(e);
                }
            }
        }

        debug!("Worker pool started with {} threads", thread_count);
        Ok(Self {
            queue,
            workers,
            thread_count,
            metrics,
        })
    }

    /// Starts one worker per available hardware thread
    pub fn with_default_threads() -> SearchResult<Self> {
        let threads = NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN);
        Self::new(threads)
    }

    /// Queues `work` and returns a handle to its eventual outcome.
    ///
    /// Never blocks. Fails with `PoolStopped` after [`shutdown`](Self::shutdown).
    pub fn submit<F, T>(&self, work: F) -> SearchResult<TaskHandle<T>>
    where
        F: FnOnce() -> SearchResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let (completer, handle) = handle::channel();
        let metrics = self.metrics.clone();

        let task: Task = Box::new(move || {
            match panic::catch_unwind(AssertUnwindSafe(work)) {
                Ok(outcome) => {
                    metrics.record_completed(outcome.is_ok());
                    completer.complete(outcome);
                }
                Err(payload) => {
                    let msg = worker::panic_message(payload.as_ref());
                    metrics.record_panicked();
                    completer.complete(Err(SearchError::task_panicked(msg)));
                }
            }
        });

        self.queue.enqueue(task)?;
        self.metrics.record_submitted();
        Ok(handle)
    }

    /// Closes the queue, lets the workers drain it, and joins every worker.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) -> SearchResult<()> {
        if self.workers.is_empty() {
            return Ok(());
        }

        debug!(
            "Shutting down worker pool ({} tasks pending)",
            self.pending_tasks()
        );
        self.queue.close();

        let mut first_error = None;
        for mut worker in self.workers.drain(..) {
            if let Err(e) = worker.join() {
                error!("Failed to join worker {}: {}", worker.id(), e);
                first_error.get_or_insert(e);
            }
        }

        debug!("Worker pool stopped");
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Whether the pool still accepts tasks
    pub fn is_running(&self) -> bool {
        !self.queue.is_closed()
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Number of worker threads still inside their run loop
    pub fn alive_workers(&self) -> usize {
        self.metrics.workers_alive() as usize
    }

    /// Tasks waiting for a worker
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            error!("Worker pool shutdown failed: {}", e);
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("thread_count", &self.thread_count)
            .field("pending_tasks", &self.pending_tasks())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn threads(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_submit_and_join() {
        let mut pool = WorkerPool::new(threads(2)).unwrap();
        let handles: Vec<_> = (0..10u64)
            .map(|i| pool.submit(move || Ok(i * i)).unwrap())
            .collect();

        let results: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, (0..10u64).map(|i| i * i).collect::<Vec<_>>());

        pool.shutdown().unwrap();
        let stats = pool.metrics().get_stats();
        assert_eq!(stats.tasks_submitted, 10);
        assert_eq!(stats.tasks_completed, 10);
        assert_eq!(stats.tasks_failed, 0);
    }

    #[test]
    fn test_task_error_is_returned() {
        let pool = WorkerPool::new(threads(1)).unwrap();
        let handle = pool
            .submit(|| -> SearchResult<()> { Err(SearchError::config_error("bad")) })
            .unwrap();

        assert!(matches!(handle.join(), Err(SearchError::ConfigError(_))));
        assert_eq!(pool.metrics().get_stats().tasks_failed, 1);
    }

    #[test]
    fn test_panicking_task_does_not_kill_worker() {
        let mut pool = WorkerPool::new(threads(1)).unwrap();

        let bad = pool
            .submit(|| -> SearchResult<u32> { panic!("task exploded") })
            .unwrap();
        let good = pool.submit(|| Ok(7u32)).unwrap();

        match bad.join() {
            Err(SearchError::TaskPanicked(msg)) => assert!(msg.contains("task exploded")),
            other => panic!("expected a panic failure, got {:?}", other),
        }
        assert_eq!(good.join().unwrap(), 7);

        assert_eq!(pool.alive_workers(), 1);
        pool.shutdown().unwrap();
        assert_eq!(pool.metrics().get_stats().tasks_panicked, 1);
    }

    #[test]
    fn test_shutdown_drains_queue() {
        let mut pool = WorkerPool::new(threads(2)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let counter = Arc::clone(&counter);
                pool.submit(move || {
                    thread::sleep(Duration::from_millis(1));
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap()
            })
            .collect();

        pool.shutdown().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 50);
        assert_eq!(pool.alive_workers(), 0);
        assert!(handles.iter().all(|h| h.is_ready()));
    }

    #[test]
    fn test_pending_tasks_wait_behind_busy_worker() {
        let mut pool = WorkerPool::new(threads(1)).unwrap();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let blocker = pool
            .submit(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                Ok(0)
            })
            .unwrap();
        started_rx.recv().unwrap();

        let queued: Vec<_> = (1..=3).map(|i| pool.submit(move || Ok(i)).unwrap()).collect();
        assert_eq!(pool.pending_tasks(), 3);

        release_tx.send(()).unwrap();
        pool.shutdown().unwrap();
        assert_eq!(pool.pending_tasks(), 0);
        assert_eq!(blocker.join().unwrap(), 0);
        let values: Vec<i32> = queued.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut pool = WorkerPool::new(threads(2)).unwrap();
        pool.shutdown().unwrap();
        pool.shutdown().unwrap();

        assert!(!pool.is_running());
        let result = pool.submit(|| Ok(()));
        assert!(matches!(result, Err(SearchError::PoolStopped)));
    }

    #[test]
    fn test_drop_joins_workers() {
        let counter = Arc::new(AtomicUsize::new(0));
        let metrics = {
            let pool = WorkerPool::new(threads(3)).unwrap();
            for _ in 0..20 {
                let counter = Arc::clone(&counter);
                pool.submit(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
            }
            pool.metrics().clone()
        };

        assert_eq!(counter.load(Ordering::SeqCst), 20);
        assert_eq!(metrics.workers_alive(), 0);
    }

    #[test]
    fn test_default_thread_count() {
        let pool = WorkerPool::with_default_threads().unwrap();
        assert_eq!(pool.thread_count(), num_cpus::get().max(1));
        assert!(pool.is_running());
    }
}
