//! Bounded worker pool for expensive, stateless per-module work.
//!
//! A fixed-size set of workers; tasks queue FIFO when all workers are busy,
//! and a worker becomes available again only after it completes its current
//! task. There is no preemption or timeout. A panicking task is contained
//! and surfaced as a [`WorkerError::TaskFailed`] rather than aborting the
//! process.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::WorkerError;

/// A fixed-size pool of isolated workers.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Builds a pool with the given number of workers.
    pub fn new(workers: usize) -> Result<Self, WorkerError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| WorkerError::PoolBuild(e.to_string()))?;
        Ok(Self { pool })
    }

    /// The number of workers in the pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs a task on an idle worker and blocks until it completes.
    ///
    /// A panic inside the task is caught and returned as
    /// [`WorkerError::TaskFailed`].
    pub fn run<T, F>(&self, task: F) -> Result<T, WorkerError>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        self.pool
            .install(|| catch_unwind(AssertUnwindSafe(task)))
            .map_err(|payload| WorkerError::TaskFailed {
                reason: panic_message(payload.as_ref()),
            })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
