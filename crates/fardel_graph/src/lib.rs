//! The module graph: the durable output of dependency discovery.
//!
//! The graph builder loads, parses, and recursively discovers dependencies
//! for a set of seed references, producing a deduplicated, content-hashed
//! module set. Modules are immutable values keyed by absolute path; the
//! path-keyed cache is the single source of truth, and every downstream
//! consumer works with hashes and the graph's hash index.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod graph;
pub mod module;
pub mod ops;

pub use builder::GraphBuilder;
pub use error::GraphError;
pub use graph::ModuleGraph;
pub use module::Module;
pub use ops::{DiscoverRequest, Discovered, GraphOps, HashExtraRequest, LoadRequest, ResolveRequest};
