use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Tracks task throughput and worker liveness for a pool
#[derive(Debug, Clone)]
pub struct PoolMetrics {
    // Task metrics
    tasks_submitted: Arc<AtomicU64>,
    tasks_completed: Arc<AtomicU64>,
    tasks_failed: Arc<AtomicU64>,
    tasks_panicked: Arc<AtomicU64>,

    // Worker metrics
    workers_alive: Arc<AtomicU64>,
}

impl PoolMetrics {
    /// Creates a new PoolMetrics instance
    pub fn new() -> Self {
        Self {
            tasks_submitted: Arc::new(AtomicU64::new(0)),
            tasks_completed: Arc::new(AtomicU64::new(0)),
            tasks_failed: Arc::new(AtomicU64::new(0)),
            tasks_panicked: Arc::new(AtomicU64::new(0)),
            workers_alive: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a task accepted by the queue
    pub fn record_submitted(&self) {
        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a finished task; `ok` is false when it returned an error
    pub fn record_completed(&self, ok: bool) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.tasks_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a task that panicked while running
    pub fn record_panicked(&self) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn worker_started(&self) {
        self.workers_alive.fetch_add(1, Ordering::SeqCst);
    }

    pub fn worker_stopped(&self) {
        self.workers_alive.fetch_sub(1, Ordering::SeqCst);
    }

    /// Number of worker threads currently inside their run loop
    pub fn workers_alive(&self) -> u64 {
        self.workers_alive.load(Ordering::SeqCst)
    }

    /// Gets current pool statistics
    pub fn get_stats(&self) -> PoolStats {
        PoolStats {
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_failed: self.tasks_failed.load(Ordering::Relaxed),
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
            workers_alive: self.workers_alive.load(Ordering::SeqCst),
        }
    }

    /// Logs current pool statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        debug!(
            "Pool stats:\n\
             Tasks submitted/completed: {}/{}\n\
             Tasks failed (panicked): {} ({})\n\
             Workers alive: {}",
            stats.tasks_submitted,
            stats.tasks_completed,
            stats.tasks_failed,
            stats.tasks_panicked,
            stats.workers_alive
        );
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of pool counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub tasks_submitted: u64,
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub tasks_panicked: u64,
    pub workers_alive: u64,
}
