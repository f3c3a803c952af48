//! The four-phase bundle partitioner.
//!
//! Produces pairwise-disjoint module-hash sets whose union equals the union
//! of the seeds' reachable sets. Partitioning is pure over the graph: given
//! resolved seeds and a valid graph it cannot fail except for dangling
//! lookups, which indicate a caller bug, not an input problem.

use std::collections::BTreeSet;
use std::path::PathBuf;

use fardel_common::ContentHash;
use fardel_graph::ModuleGraph;

use crate::bundle::{self, Bundle};
use crate::error::BundleError;
use crate::spec::BundleSpec;
use crate::template;

/// A bundle mid-partition: just a name, a working set, and emission flags.
struct PendingBundle {
    name: String,
    dest_template: String,
    set: BTreeSet<ContentHash>,
    root: Option<ContentHash>,
    is_entry_point: bool,
    include_runtime: bool,
}

/// Partitions the modules reachable from the given seeds into disjoint
/// bundles.
///
/// `roots[i]` is the resolved absolute path of `specs[i]`'s seed, as
/// returned by the graph builder. Implicit bundles synthesized for shared
/// subtrees use `implicit_template` as their destination template.
///
/// Phases:
/// 1. Seed: each spec's set is its root module plus the root's deep
///    dependencies.
/// 2. Explicit de-duplication: if bundle B's root lies inside bundle A's
///    set, A yields B's whole set. A declared split point owns its subtree
///    even when an entry also reaches it.
/// 3. Implicit splitting to a fixed point: ascending index pairs over the
///    growing bundle list; every non-empty pairwise intersection is carved
///    out into an appended implicit bundle, which is itself scanned against
///    later bundles. Emptied bundles are dropped afterwards.
/// 4. Materialization: verify every hash against the graph, compute
///    `set_hash` and the bundle hash, and interpolate the destination.
pub fn partition(
    specs: &[BundleSpec],
    roots: &[PathBuf],
    graph: &ModuleGraph,
    implicit_template: &str,
) -> Result<Vec<Bundle>, BundleError> {
    let mut bundles: Vec<PendingBundle> = Vec::with_capacity(specs.len());
    for (spec, path) in specs.iter().zip(roots) {
        let module = graph.get(path).ok_or_else(|| BundleError::MissingSeed {
            path: path.clone(),
        })?;
        let mut set = module.deep_dependencies.clone();
        set.insert(module.hash);
        bundles.push(PendingBundle {
            name: spec.name.clone(),
            dest_template: spec.dest_template.clone(),
            set,
            root: Some(module.hash),
            is_entry_point: spec.is_entry_point,
            include_runtime: spec.is_entry_point && !spec.exclude_runtime,
        });
    }

    for a in 0..bundles.len() {
        for b in 0..bundles.len() {
            if a == b {
                continue;
            }
            let Some(b_root) = bundles[b].root else {
                continue;
            };
            if bundles[a].set.contains(&b_root) {
                let b_set = bundles[b].set.clone();
                bundles[a].set.retain(|hash| !b_set.contains(hash));
            }
        }
    }

    // The outer bound is re-evaluated on purpose: appended implicit bundles
    // take part in later scans, which is what drives the fixed point.
    let mut implicit_count = 0usize;
    let mut i = 0;
    while i < bundles.len() {
        let mut j = i + 1;
        while j < bundles.len() {
            let intersection: BTreeSet<ContentHash> = bundles[i]
                .set
                .intersection(&bundles[j].set)
                .copied()
                .collect();
            if !intersection.is_empty() {
                bundles[i].set.retain(|hash| !intersection.contains(hash));
                bundles[j].set.retain(|hash| !intersection.contains(hash));
                implicit_count += 1;
                bundles.push(PendingBundle {
                    name: format!("implicit-{implicit_count}"),
                    dest_template: implicit_template.to_string(),
                    set: intersection,
                    root: None,
                    is_entry_point: false,
                    include_runtime: false,
                });
            }
            j += 1;
        }
        i += 1;
    }
    bundles.retain(|bundle| !bundle.set.is_empty());

    let mut materialized = Vec::with_capacity(bundles.len());
    for pending in bundles {
        for hash in &pending.set {
            if graph.by_hash(hash).is_none() {
                return Err(BundleError::MissingModule { hash: *hash });
            }
        }
        let set_hash = bundle::set_hash(&pending.set);
        let hash = bundle::bundle_hash(&set_hash, pending.is_entry_point, pending.include_runtime);
        let dest = template::interpolate(
            &pending.dest_template,
            &set_hash,
            &hash,
            pending.root.as_ref(),
        )?;
        materialized.push(Bundle {
            name: pending.name,
            dest_template: pending.dest_template,
            module_hashes: pending.set,
            root: pending.root,
            is_entry_point: pending.is_entry_point,
            include_runtime: pending.include_runtime,
            set_hash,
            hash,
            dest,
        });
    }
    Ok(materialized)
}
