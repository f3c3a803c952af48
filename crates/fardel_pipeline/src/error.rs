//! Error types for the worker pool.

/// Errors produced by the bounded worker pool.
///
/// A failed task is propagated to the caller as an error; the base design
/// performs no automatic retry.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The pool itself could not be constructed.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(String),

    /// A dispatched task panicked or otherwise failed inside a worker.
    #[error("worker task failed: {reason}")]
    TaskFailed {
        /// Description of the task failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_failed_display() {
        let err = WorkerError::TaskFailed {
            reason: "index out of bounds".to_string(),
        };
        assert_eq!(format!("{err}"), "worker task failed: index out of bounds");
    }

    #[test]
    fn pool_build_display() {
        let err = WorkerError::PoolBuild("no threads".to_string());
        assert!(format!("{err}").starts_with("failed to build worker pool:"));
    }
}
