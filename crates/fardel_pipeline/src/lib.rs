//! The pluggable pipeline substrate every compilation phase runs through.
//!
//! Each phase (resolve, load, discover, hash, partition, render) is a named
//! operation with a default implementation and a [`Chain`] of plugin-supplied
//! overrides and transforms. Overrides are tried in registration order and
//! may fall through via a tagged sentinel; transforms always rewrite the
//! current result. Every invocation gets a copy-on-write fork of the mutable
//! operation context, so child invocations never leak mutations to their
//! parent or to siblings.
//!
//! The crate also provides the bounded worker pool used for expensive,
//! stateless per-module work.

#![warn(missing_docs)]

pub mod chain;
pub mod context;
pub mod error;
pub mod workers;

pub use chain::{Chain, OverrideOutcome};
pub use context::OpContext;
pub use error::WorkerError;
pub use workers::WorkerPool;
