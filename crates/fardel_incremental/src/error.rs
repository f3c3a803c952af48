//! Compilation errors.

use fardel_bundle::BundleError;
use fardel_graph::GraphError;
use fardel_pipeline::WorkerError;
use thiserror::Error;

/// Any error raised during a full or incremental compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Graph building failed (load, parse, resolve, or discovery).
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Partitioning, rendering, or artifact output failed.
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// A worker-pool task failed or the pool could not be built.
    #[error(transparent)]
    Worker(#[from] WorkerError),
}
