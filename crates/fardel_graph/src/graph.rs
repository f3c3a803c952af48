//! The path-keyed module cache with a hash index.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use fardel_common::ContentHash;

use crate::module::Module;

/// The module graph: a mapping from absolute path to its module.
///
/// Acts as both a memoization table (a module reached via two import paths
/// is built once) and the home of invalidation during incremental
/// recompilation. The graph exclusively owns the canonical copy of each
/// module; consumers hold `Arc` clones and hashes, never a mutable handle.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    by_path: HashMap<std::path::PathBuf, Arc<Module>>,
    // A hash can be held by several paths at once: byte-identical copies of
    // a package vendored under different containers hash identically. The
    // index entry lives until the last holder is gone.
    by_hash: HashMap<ContentHash, Vec<Arc<Module>>>,
}

impl ModuleGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a finished module, replacing any prior value under its path.
    pub fn insert(&mut self, module: Arc<Module>) {
        if let Some(old) = self.by_path.insert(module.path.clone(), module.clone()) {
            self.unindex_hash(&old.hash, &old.path);
        }
        self.by_hash.entry(module.hash).or_default().push(module);
    }

    /// Looks up a module by its absolute path.
    pub fn get(&self, path: &Path) -> Option<&Arc<Module>> {
        self.by_path.get(path)
    }

    /// Looks up a module by its content hash.
    ///
    /// When several paths hold the same content, any one of them answers;
    /// they are interchangeable for everything keyed by hash.
    pub fn by_hash(&self, hash: &ContentHash) -> Option<&Arc<Module>> {
        self.by_hash.get(hash).and_then(|holders| holders.first())
    }

    /// All modules currently holding the given content hash.
    pub fn holders_of(&self, hash: &ContentHash) -> impl Iterator<Item = &Arc<Module>> {
        self.by_hash.get(hash).into_iter().flatten()
    }

    /// Removes the module under `path`, returning the evicted value.
    pub fn evict(&mut self, path: &Path) -> Option<Arc<Module>> {
        let module = self.by_path.remove(path)?;
        self.unindex_hash(&module.hash, path);
        Some(module)
    }

    /// Drops `path` from the holders of `hash`, removing the index entry
    /// once no path holds that hash anymore.
    fn unindex_hash(&mut self, hash: &ContentHash, path: &Path) {
        if let Some(holders) = self.by_hash.get_mut(hash) {
            holders.retain(|m| m.path.as_path() != path);
            if holders.is_empty() {
                self.by_hash.remove(hash);
            }
        }
    }

    /// Returns `true` if a module is cached under `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    /// The number of cached modules.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Returns `true` if the graph holds no modules.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Iterates over all cached modules in unspecified order.
    pub fn modules(&self) -> impl Iterator<Item = &Arc<Module>> {
        self.by_path.values()
    }
}
