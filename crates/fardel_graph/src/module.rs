//! The module value: one source file plus its resolved dependency closure.

use std::collections::BTreeSet;
use std::path::PathBuf;

use fardel_codegen::Ast;
use fardel_common::ContentHash;

/// One module of the dependency graph.
///
/// A module is an immutable value. Its absolute path is its identity for the
/// lifetime of the process; on incremental recompilation a *new* module
/// value replaces the old one under the same path key. Dependencies are
/// recorded as content hashes and materialized through the graph's hash
/// index, so module values never form reference cycles even when the import
/// graph does.
///
/// The content hash is defined only once every dependency hash is known: it
/// digests the raw source, the namespace name, the namespace-relative path,
/// and the dependency hash list sorted ascending, which makes it invariant
/// to the declared import order.
#[derive(Debug, Clone)]
pub struct Module {
    /// Absolute path: the process-wide unique identity key.
    pub path: PathBuf,
    /// The namespace (logical package) this module belongs to.
    pub namespace: String,
    /// Path relative to the namespace root, with `/` separators.
    pub relative_path: String,
    /// Canonical URI: `namespace:relative_path`.
    pub uri: String,
    /// Raw source text as loaded from disk.
    pub source: String,
    /// Parsed body with import arguments rewritten to dependency hashes.
    pub ast: Ast,
    /// Direct dependency hashes, in declared import order (deduplicated).
    pub dependencies: Vec<ContentHash>,
    /// Transitive dependency closure, deduplicated by hash.
    pub deep_dependencies: BTreeSet<ContentHash>,
    /// The module's content hash.
    pub hash: ContentHash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fardel_codegen::parse;

    #[test]
    fn module_is_a_plain_value() {
        let ast = parse("x", "app:a.js").unwrap();
        let m = Module {
            path: PathBuf::from("/p/a.js"),
            namespace: "app".to_string(),
            relative_path: "a.js".to_string(),
            uri: "app:a.js".to_string(),
            source: "x".to_string(),
            ast,
            dependencies: Vec::new(),
            deep_dependencies: BTreeSet::new(),
            hash: ContentHash::from_bytes(b"x"),
        };
        let copy = m.clone();
        assert_eq!(copy.uri, "app:a.js");
        assert_eq!(copy.hash, m.hash);
    }
}
