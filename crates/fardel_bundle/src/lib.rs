//! Bundle partitioning and artifact rendering.
//!
//! Takes the built module graph plus the declared bundle specs and produces
//! a true set partition of the reachable modules: every module lands in
//! exactly one bundle, shared subtrees are hoisted into implicit bundles,
//! and each bundle gets a content-derived `set_hash` and bundle `hash` that
//! drive cache-busting destination names.

#![warn(missing_docs)]

pub mod bundle;
pub mod error;
pub mod ops;
pub mod partition;
pub mod render;
pub mod spec;
pub mod template;

pub use bundle::Bundle;
pub use error::BundleError;
pub use ops::{BundleOps, PartitionRequest, RenderRequest};
pub use partition::partition;
pub use render::{render, write_artifacts, Artifact, CompilationResult};
pub use spec::BundleSpec;
