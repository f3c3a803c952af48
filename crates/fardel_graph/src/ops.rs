//! The graph-building operations exposed to plugins.
//!
//! Every phase of graph building runs through a named [`Chain`]: `resolve`,
//! `load`, `discover`, and `hash_extra`. A plugin is a function over
//! [`GraphOps`] that registers overrides and transforms on the chains it
//! cares about; the builder supplies each chain's default implementation at
//! invocation time. Only the operations listed here are reachable from
//! graph building; an extension cannot call into arbitrary phases.

use std::path::PathBuf;

use fardel_codegen::Ast;
use fardel_pipeline::Chain;
use fardel_resolve::ResolvedAsset;

use crate::error::GraphError;

/// Arguments of the `resolve` operation: one import request in context.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// The import string as written in the module body.
    pub request: String,
    /// Directory of the importing module.
    pub context_dir: PathBuf,
    /// Namespace of the importing module.
    pub namespace: String,
    /// Namespace root of the importing module.
    pub namespace_root: PathBuf,
}

/// Arguments of the `load` operation: read one module's source text.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Absolute path of the file to load.
    pub path: PathBuf,
}

/// Arguments of the `discover` operation: parse and extract imports.
#[derive(Debug, Clone)]
pub struct DiscoverRequest {
    /// Absolute path of the module.
    pub path: PathBuf,
    /// Canonical URI of the module.
    pub uri: String,
    /// Raw source text.
    pub source: String,
}

/// Result of the `discover` operation.
///
/// Transforms may rewrite the AST, but must keep `imports` in sync: it is
/// the ordered, deduplicated list of synchronous import strings found in
/// the module body.
#[derive(Debug, Clone)]
pub struct Discovered {
    /// The parsed (and possibly plugin-rewritten) module body.
    pub ast: Ast,
    /// Synchronous import strings, deduplicated, insertion order preserved.
    pub imports: Vec<String>,
}

/// Arguments of the `hash_extra` operation.
///
/// Plugins that alter runtime semantics without altering source text inject
/// additional digest input here; the result is appended to the module's
/// hash input after the dependency hashes.
#[derive(Debug, Clone)]
pub struct HashExtraRequest {
    /// Absolute path of the module being hashed.
    pub path: PathBuf,
    /// Canonical URI of the module being hashed.
    pub uri: String,
}

/// The named operations of graph building.
pub struct GraphOps {
    /// Maps an import request to a resolved asset.
    pub resolve: Chain<ResolveRequest, ResolvedAsset, GraphError>,
    /// Reads a module's source text.
    pub load: Chain<LoadRequest, String, GraphError>,
    /// Parses a module body and extracts its import list.
    pub discover: Chain<DiscoverRequest, Discovered, GraphError>,
    /// Supplies extra digest input for a module's content hash.
    pub hash_extra: Chain<HashExtraRequest, Vec<u8>, GraphError>,
}

impl GraphOps {
    /// Creates the operation set with empty chains.
    pub fn new() -> Self {
        Self {
            resolve: Chain::new("resolve"),
            load: Chain::new("load"),
            discover: Chain::new("discover"),
            hash_extra: Chain::new("hash_extra"),
        }
    }

    /// Applies a plugin's registrations to these operations.
    pub fn install<F>(&mut self, plugin: F)
    where
        F: FnOnce(&mut GraphOps),
    {
        plugin(self);
    }
}

impl Default for GraphOps {
    fn default() -> Self {
        Self::new()
    }
}
