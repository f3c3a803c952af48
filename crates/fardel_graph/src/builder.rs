//! Recursive, memoized module graph construction.
//!
//! Seeds are resolved and built depth-first: a module is claimed in the
//! build state before its dependencies are explored (single-flight per
//! absolute path), dependencies are built pre-order, and the module's hash
//! is completed post-order once every dependency hash is known.
//!
//! Cycle handling: because the claim happens before recursion, an import
//! that reaches an in-progress module is a cycle back-edge. The back-edge
//! contributes the target's canonical URI to the hash input instead of its
//! not-yet-known hash, and a fixup pass after the build installs the final
//! dependency hash, closes the deep-dependency sets, and rewrites the
//! importer's AST, so both cycle members end up referencing each other by
//! final hash.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fardel_codegen::parse;
use fardel_common::{ContentHash, ContentHasher};
use fardel_pipeline::OpContext;
use fardel_resolve::{ModuleReference, ResolvedAsset, Resolver};

use crate::error::GraphError;
use crate::graph::ModuleGraph;
use crate::module::Module;
use crate::ops::{DiscoverRequest, Discovered, GraphOps, HashExtraRequest, LoadRequest, ResolveRequest};

/// One graph build over a shared module cache.
///
/// The builder owns the in-flight state of a single build; the cache it
/// extends lives in the [`ModuleGraph`] and survives across builds, which is
/// what makes incremental recompilation cheap. Dropping a builder mid-error
/// discards all in-flight modules, leaving the graph exactly as it was.
pub struct GraphBuilder<'a> {
    resolver: &'a Resolver,
    ops: &'a GraphOps,
    graph: &'a mut ModuleGraph,
    ctx: OpContext,
    building: HashMap<PathBuf, Slot>,
    building_by_hash: HashMap<ContentHash, PathBuf>,
    completion_order: Vec<PathBuf>,
    pending: Vec<PendingEdge>,
}

/// Single-flight state per path: claimed before recursion, done after.
enum Slot {
    InProgress { uri: String },
    Done(Module),
}

/// A dependency edge whose target was in progress when the edge was found.
struct PendingEdge {
    importer: PathBuf,
    request: String,
    dep: PathBuf,
    /// Position in the importer's declared dependency order.
    index: usize,
}

enum DepOutcome {
    Done(ContentHash),
    InProgress { path: PathBuf, uri: String },
}

impl<'a> GraphBuilder<'a> {
    /// Starts a build over the given cache.
    pub fn new(resolver: &'a Resolver, ops: &'a GraphOps, graph: &'a mut ModuleGraph) -> Self {
        Self {
            resolver,
            ops,
            graph,
            ctx: OpContext::new(),
            building: HashMap::new(),
            building_by_hash: HashMap::new(),
            completion_order: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Resolves a seed reference in the given namespace and builds its
    /// whole dependency subtree. Returns the seed module's absolute path.
    pub fn add_seed(
        &mut self,
        reference: &ModuleReference,
        namespace: &str,
        namespace_root: &Path,
    ) -> Result<PathBuf, GraphError> {
        let resolver = self.resolver;
        let request = ResolveRequest {
            request: reference.request.clone(),
            context_dir: reference.context_dir.clone(),
            namespace: namespace.to_string(),
            namespace_root: namespace_root.to_path_buf(),
        };
        let ctx = self.ctx.clone();
        let asset = self.ops.resolve.invoke(&request, &ctx, |args, _| {
            resolver
                .resolve(
                    &ModuleReference::new(args.request.clone(), args.context_dir.clone()),
                    &args.namespace,
                    &args.namespace_root,
                )
                .map_err(|source| GraphError::UnresolvedSeed {
                    request: args.request.clone(),
                    source,
                })
        })?;
        let path = asset.path.clone();
        self.build_module(asset)?;
        Ok(path)
    }

    /// Finalizes the build: applies cycle fixups, closes deep-dependency
    /// sets, and installs every newly built module into the graph.
    ///
    /// Returns the new modules in completion order. This is the "patch"
    /// stream incremental recompilation forwards before re-partitioning.
    pub fn finish(mut self) -> Vec<Arc<Module>> {
        self.apply_pending_edges();
        self.close_deep_dependencies();

        let mut new_modules = Vec::with_capacity(self.completion_order.len());
        let order = std::mem::take(&mut self.completion_order);
        for path in order {
            if let Some(Slot::Done(module)) = self.building.remove(&path) {
                let module = Arc::new(module);
                self.graph.insert(module.clone());
                new_modules.push(module);
            }
        }
        new_modules
    }

    fn build_module(&mut self, asset: ResolvedAsset) -> Result<DepOutcome, GraphError> {
        // Memoization: completed in a prior build, completed in this one,
        // or claimed and still in flight (a cycle back-edge).
        if let Some(module) = self.graph.get(&asset.path) {
            return Ok(DepOutcome::Done(module.hash));
        }
        match self.building.get(&asset.path) {
            Some(Slot::Done(module)) => return Ok(DepOutcome::Done(module.hash)),
            Some(Slot::InProgress { uri }) => {
                return Ok(DepOutcome::InProgress {
                    path: asset.path.clone(),
                    uri: uri.clone(),
                })
            }
            None => {}
        }
        self.building.insert(
            asset.path.clone(),
            Slot::InProgress {
                uri: asset.uri.clone(),
            },
        );

        let ops = self.ops;
        let resolver = self.resolver;
        let ctx = self.ctx.clone();

        let load_request = LoadRequest {
            path: asset.path.clone(),
        };
        let source = ops.load.invoke(&load_request, &ctx, |args, _| {
            std::fs::read_to_string(&args.path).map_err(|source| GraphError::Io {
                path: args.path.clone(),
                source,
            })
        })?;

        let discover_request = DiscoverRequest {
            path: asset.path.clone(),
            uri: asset.uri.clone(),
            source: source.clone(),
        };
        let Discovered { mut ast, imports } =
            ops.discover.invoke(&discover_request, &ctx, |args, _| {
                let ast = parse(&args.source, &args.uri)?;
                if !ast.empty_import_offsets().is_empty() {
                    return Err(GraphError::EmptyImport {
                        importer: args.uri.clone(),
                    });
                }
                let mut seen = HashSet::new();
                let imports = ast
                    .import_args()
                    .into_iter()
                    .filter(|arg| seen.insert(arg.to_string()))
                    .map(str::to_string)
                    .collect();
                Ok(Discovered { ast, imports })
            })?;
        if imports.iter().any(String::is_empty) {
            return Err(GraphError::EmptyImport {
                importer: asset.uri.clone(),
            });
        }

        let context_dir = asset
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut dependencies: Vec<ContentHash> = Vec::new();
        let mut resolved_hashes: HashMap<String, ContentHash> = HashMap::new();
        let mut pending_uris: Vec<String> = Vec::new();
        let mut pending_count = 0usize;

        for request in &imports {
            let resolve_request = ResolveRequest {
                request: request.clone(),
                context_dir: context_dir.clone(),
                namespace: asset.namespace.clone(),
                namespace_root: asset.namespace_root.clone(),
            };
            let importer_uri = asset.uri.clone();
            let dep_asset = ops.resolve.invoke(&resolve_request, &ctx, move |args, _| {
                resolver
                    .resolve(
                        &ModuleReference::new(args.request.clone(), args.context_dir.clone()),
                        &args.namespace,
                        &args.namespace_root,
                    )
                    .map_err(|source| GraphError::UnresolvedImport {
                        importer: importer_uri,
                        request: args.request.clone(),
                        source,
                    })
            })?;
            match self.build_module(dep_asset)? {
                DepOutcome::Done(hash) => {
                    dependencies.push(hash);
                    resolved_hashes.insert(request.clone(), hash);
                }
                DepOutcome::InProgress { path, uri } => {
                    self.pending.push(PendingEdge {
                        importer: asset.path.clone(),
                        request: request.clone(),
                        dep: path,
                        index: dependencies.len() + pending_count,
                    });
                    pending_uris.push(uri);
                    pending_count += 1;
                }
            }
        }

        let mut deep_dependencies: BTreeSet<ContentHash> = BTreeSet::new();
        for hash in &dependencies {
            deep_dependencies.insert(*hash);
            if let Some(deep) = self.deep_of(hash) {
                deep_dependencies.extend(deep);
            }
        }

        // Post-order hash: every (non-cycle) dependency hash is known here.
        // Dependency hashes are sorted so the digest is invariant to the
        // declared import order; cycle back-edges contribute their target's
        // canonical URI instead.
        let mut hasher = ContentHasher::new();
        hasher.update_str(&source);
        hasher.update_str(&asset.namespace);
        hasher.update_str(&asset.relative_path);
        let mut sorted_deps = dependencies.clone();
        sorted_deps.sort();
        for hash in &sorted_deps {
            hasher.update_hash(hash);
        }
        pending_uris.sort();
        for uri in &pending_uris {
            hasher.update_str(uri);
        }
        let extra_request = HashExtraRequest {
            path: asset.path.clone(),
            uri: asset.uri.clone(),
        };
        let extra = ops
            .hash_extra
            .invoke(&extra_request, &ctx, |_, _| Ok(Vec::new()))?;
        hasher.update(&extra);
        let hash = hasher.finish();

        // The runtime dereferences dependencies by content hash, not path.
        ast.rewrite_imports(|arg| resolved_hashes.get(arg).map(ContentHash::to_hex));

        let module = Module {
            path: asset.path.clone(),
            namespace: asset.namespace,
            relative_path: asset.relative_path,
            uri: asset.uri,
            source,
            ast,
            dependencies,
            deep_dependencies,
            hash,
        };
        self.building_by_hash.insert(hash, asset.path.clone());
        self.building.insert(asset.path.clone(), Slot::Done(module));
        self.completion_order.push(asset.path);
        Ok(DepOutcome::Done(hash))
    }

    /// Installs the final dependency hash for every cycle back-edge and
    /// rewrites the importer's AST with it.
    fn apply_pending_edges(&mut self) {
        let mut edges = std::mem::take(&mut self.pending);
        edges.sort_by(|a, b| a.importer.cmp(&b.importer).then(a.index.cmp(&b.index)));
        for edge in edges {
            let dep_hash = match self.building.get(&edge.dep) {
                Some(Slot::Done(module)) => module.hash,
                _ => match self.graph.get(&edge.dep) {
                    Some(module) => module.hash,
                    None => continue,
                },
            };
            if let Some(Slot::Done(importer)) = self.building.get_mut(&edge.importer) {
                let index = edge.index.min(importer.dependencies.len());
                importer.dependencies.insert(index, dep_hash);
                let hex = dep_hash.to_hex();
                importer
                    .ast
                    .rewrite_imports(|arg| (arg == edge.request).then(|| hex.clone()));
            }
        }
    }

    /// Re-closes deep-dependency sets after cycle fixups.
    ///
    /// Iterates to a fixed point; sets only grow toward the transitive
    /// closure, so termination is bounded by the module count.
    fn close_deep_dependencies(&mut self) {
        let mut paths: Vec<PathBuf> = self.building.keys().cloned().collect();
        paths.sort();
        loop {
            let mut changed = false;
            for path in &paths {
                let deps = match self.building.get(path) {
                    Some(Slot::Done(module)) => module.dependencies.clone(),
                    _ => continue,
                };
                let mut closure: BTreeSet<ContentHash> = BTreeSet::new();
                for hash in &deps {
                    closure.insert(*hash);
                    if let Some(deep) = self.deep_of(hash) {
                        closure.extend(deep);
                    }
                }
                if let Some(Slot::Done(module)) = self.building.get_mut(path) {
                    let before = module.deep_dependencies.len();
                    module.deep_dependencies.extend(closure);
                    if module.deep_dependencies.len() > before {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn deep_of(&self, hash: &ContentHash) -> Option<BTreeSet<ContentHash>> {
        if let Some(module) = self.graph.by_hash(hash) {
            return Some(module.deep_dependencies.clone());
        }
        let path = self.building_by_hash.get(hash)?;
        match self.building.get(path) {
            Some(Slot::Done(module)) => Some(module.deep_dependencies.clone()),
            _ => None,
        }
    }
}
