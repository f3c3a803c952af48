//! The materialized bundle.

use std::collections::BTreeSet;

use fardel_common::{ContentHash, ContentHasher};

/// One emitted bundle after partitioning.
///
/// `module_hashes` is disjoint from every other bundle's set in the same
/// compilation; the union over all bundles covers every module reachable
/// from a declared seed exactly once.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Bundle name, declared or synthesized for implicit bundles.
    pub name: String,
    /// Destination template the final `dest` was interpolated from.
    pub dest_template: String,
    /// The bundle's module set, by content hash.
    pub module_hashes: BTreeSet<ContentHash>,
    /// The declared seed's module hash; implicit bundles have none.
    pub root: Option<ContentHash>,
    /// Whether the artifact boots its root module on load.
    pub is_entry_point: bool,
    /// Whether the artifact carries the module-loading runtime.
    pub include_runtime: bool,
    /// Digest of the sorted module-hash set.
    pub set_hash: ContentHash,
    /// Digest of `set_hash` plus the emission flags.
    pub hash: ContentHash,
    /// Interpolated destination path, relative to the output directory.
    pub dest: String,
}

/// Digest of a module-hash set. `BTreeSet` iteration is already sorted, so
/// the digest is independent of how the set was assembled.
pub(crate) fn set_hash(module_hashes: &BTreeSet<ContentHash>) -> ContentHash {
    let mut hasher = ContentHasher::new();
    for hash in module_hashes {
        hasher.update_hash(hash);
    }
    hasher.finish()
}

/// Bundle hash: the set digest plus the flags that change the emitted code.
pub(crate) fn bundle_hash(
    set_hash: &ContentHash,
    is_entry_point: bool,
    include_runtime: bool,
) -> ContentHash {
    let mut hasher = ContentHasher::new();
    hasher.update_hash(set_hash);
    hasher.update_bool(is_entry_point);
    hasher.update_bool(include_runtime);
    hasher.finish()
}
