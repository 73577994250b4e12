use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, trace};

use super::queue::TaskQueue;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::PoolMetrics;

/// Prefix for worker thread names; the worker index is appended
pub const THREAD_NAME_PREFIX: &str = "strsearch-worker";

/// A long-lived thread that runs tasks from a shared queue until the queue
/// is closed and drained
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawns the worker thread
    pub fn spawn(id: usize, queue: Arc<TaskQueue>, metrics: PoolMetrics) -> SearchResult<Self> {
        let thread = thread::Builder::new()
            .name(format!("{}-{}", THREAD_NAME_PREFIX, id))
            .spawn(move || run(id, &queue, &metrics))?;

        Ok(Self {
            id,
            thread: Some(thread),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Waits for the thread to exit. Calling this again is a no-op.
    pub fn join(&mut self) -> SearchResult<()> {
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| SearchError::WorkerPanicked(self.id)),
            None => Ok(()),
        }
    }
}

fn run(id: usize, queue: &TaskQueue, metrics: &PoolMetrics) {
    metrics.worker_started();
    debug!("Worker {} started", id);

    let mut executed = 0usize;
    while let Some(task) = queue.dequeue_blocking() {
        trace!("Worker {} running task", id);
        // Tasks built by WorkerPool::submit catch their own panics; this
        // guards tasks pushed onto the queue directly.
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
            error!(
                "Worker {} caught an escaped task panic: {}",
                id,
                panic_message(payload.as_ref())
            );
            metrics.record_panicked();
        }
        executed += 1;
    }

    debug!("Worker {} stopping after {} tasks", id, executed);
    metrics.worker_stopped();
}

/// Extracts a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_worker_runs_until_queue_closed() {
        let queue = Arc::new(TaskQueue::new());
        let metrics = PoolMetrics::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            queue
                .enqueue(Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }

        let mut worker = Worker::spawn(0, Arc::clone(&queue), metrics.clone()).unwrap();
        assert_eq!(worker.id(), 0);
        queue.close();
        worker.join().unwrap();
        worker.join().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 10);
        assert_eq!(metrics.workers_alive(), 0);
    }

    #[test]
    fn test_worker_survives_escaped_panic() {
        let queue = Arc::new(TaskQueue::new());
        let metrics = PoolMetrics::new();
        let counter = Arc::new(AtomicUsize::new(0));

        queue.enqueue(Box::new(|| panic!("escaped"))).unwrap();
        let after = Arc::clone(&counter);
        queue
            .enqueue(Box::new(move || {
                after.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let mut worker = Worker::spawn(1, Arc::clone(&queue), metrics.clone()).unwrap();
        queue.close();
        worker.join().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.get_stats().tasks_panicked, 1);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
