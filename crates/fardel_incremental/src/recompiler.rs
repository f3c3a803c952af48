//! The long-lived recompiler.

use std::path::{Path, PathBuf};

use fardel_bundle::{
    partition, render, Bundle, BundleOps, BundleSpec, CompilationResult, PartitionRequest,
    RenderRequest,
};
use fardel_graph::{GraphBuilder, GraphOps, ModuleGraph};
use fardel_pipeline::{OpContext, WorkerPool};
use fardel_resolve::Resolver;

use crate::error::CompileError;
use crate::events::{CompileEvent, EventSink};
use crate::index::DependentIndex;
use crate::state::CompileState;

/// Owns everything a compilation needs and keeps it warm across rebuilds.
///
/// The module graph is the durable cache: a rebuild re-seeds every spec,
/// and any module still present in the graph is reused without touching
/// disk. Invalidation evicts the changed file plus all of its transitive
/// dependents, whose hashes are stale by construction.
pub struct Recompiler {
    project_root: PathBuf,
    namespace: String,
    resolver: Resolver,
    specs: Vec<BundleSpec>,
    implicit_template: String,
    graph_ops: GraphOps,
    bundle_ops: BundleOps,
    worker_pool: Option<WorkerPool>,
    graph: ModuleGraph,
    index: DependentIndex,
    state: CompileState,
    last_good: Option<CompilationResult>,
}

impl Recompiler {
    /// Creates a recompiler with an empty graph and unextended operations.
    pub fn new(
        project_root: PathBuf,
        namespace: String,
        resolver: Resolver,
        specs: Vec<BundleSpec>,
        implicit_template: String,
    ) -> Self {
        Self {
            project_root,
            namespace,
            resolver,
            specs,
            implicit_template,
            graph_ops: GraphOps::new(),
            bundle_ops: BundleOps::new(),
            worker_pool: None,
            graph: ModuleGraph::new(),
            index: DependentIndex::new(),
            state: CompileState::Idle,
            last_good: None,
        }
    }

    /// Runs the partition and render stage on the given pool instead of
    /// the calling thread. A panic in that stage then surfaces as a
    /// [`CompileError::Worker`] instead of unwinding the caller.
    pub fn with_worker_pool(mut self, pool: WorkerPool) -> Self {
        self.worker_pool = Some(pool);
        self
    }

    /// The graph-phase operation registry, for plugin installation.
    pub fn graph_ops_mut(&mut self) -> &mut GraphOps {
        &mut self.graph_ops
    }

    /// The bundle-phase operation registry, for plugin installation.
    pub fn bundle_ops_mut(&mut self) -> &mut BundleOps {
        &mut self.bundle_ops
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CompileState {
        self.state
    }

    /// The most recent successful compilation, if any.
    pub fn last_good(&self) -> Option<&CompilationResult> {
        self.last_good.as_ref()
    }

    /// The module cache.
    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    /// Compiles everything reachable from the declared specs.
    ///
    /// On a warm graph this only rebuilds what invalidation evicted.
    pub fn build(&mut self, sink: &mut dyn EventSink) -> Result<&CompilationResult, CompileError> {
        self.state = CompileState::Rebuilding;
        match self.attempt(sink) {
            Ok(result) => {
                self.state = CompileState::Idle;
                Ok(self.last_good.insert(result))
            }
            Err(err) => {
                // The evicted modules were not rebuilt; the changes are
                // still outstanding and the prior compilation stays up.
                self.state = CompileState::Invalidated;
                sink.emit(CompileEvent::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Records a change to `path`: evicts it and every transitive
    /// dependent from the graph. Does not rebuild.
    pub fn invalidate(&mut self, path: &Path, sink: &mut dyn EventSink) {
        let mut evicted = vec![path.to_path_buf()];
        evicted.extend(self.index.dependents_of(path));
        for path in &evicted {
            self.graph.evict(path);
        }
        self.state = CompileState::Invalidated;
        sink.emit(CompileEvent::Invalidated { paths: evicted });
    }

    /// Convenience for the watch loop: invalidate then rebuild.
    pub fn on_file_change(
        &mut self,
        path: &Path,
        sink: &mut dyn EventSink,
    ) -> Result<&CompilationResult, CompileError> {
        self.invalidate(path, sink);
        self.build(sink)
    }

    fn attempt(&mut self, sink: &mut dyn EventSink) -> Result<CompilationResult, CompileError> {
        let mut builder = GraphBuilder::new(&self.resolver, &self.graph_ops, &mut self.graph);
        let mut roots = Vec::with_capacity(self.specs.len());
        for spec in &self.specs {
            roots.push(builder.add_seed(&spec.reference, &self.namespace, &self.project_root)?);
        }
        let new_modules = builder.finish();

        for module in &new_modules {
            // A dependency hash can be held by several byte-identical paths;
            // edges go to every holder so a change to any copy invalidates
            // the importer.
            let deps: Vec<PathBuf> = module
                .dependencies
                .iter()
                .flat_map(|hash| self.graph.holders_of(hash))
                .map(|dep| dep.path.clone())
                .collect();
            self.index
                .set_dependencies(&module.path, deps.iter().map(PathBuf::as_path));
        }
        sink.emit(CompileEvent::Patch {
            modules: new_modules,
        });

        let ctx = OpContext::new();
        let graph = &self.graph;
        let bundle_ops = &self.bundle_ops;
        let partition_request = PartitionRequest {
            specs: self.specs.clone(),
            roots,
            implicit_template: self.implicit_template.clone(),
        };
        let stage = move || -> Result<(Vec<Bundle>, CompilationResult), CompileError> {
            let bundles = bundle_ops
                .partition
                .invoke(&partition_request, &ctx, |args, _| {
                    partition(&args.specs, &args.roots, graph, &args.implicit_template)
                })?;
            let render_request = RenderRequest {
                bundles: bundles.clone(),
            };
            let result = bundle_ops
                .render
                .invoke(&render_request, &ctx, |args, _| render(&args.bundles, graph))?;
            Ok((bundles, result))
        };
        let (bundles, result) = match &self.worker_pool {
            Some(pool) => pool.run(stage)??,
            None => stage()?,
        };

        sink.emit(CompileEvent::Completed { bundles });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectedEvents;
    use fardel_config::ResolverConfig;
    use fardel_resolve::ModuleReference;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn recompiler(root: &Path, entries: &[&str]) -> Recompiler {
        let specs = entries
            .iter()
            .map(|name| {
                BundleSpec::entry(
                    *name,
                    ModuleReference::new(format!("./{name}.js"), root),
                    format!("{name}.[hash].js"),
                )
            })
            .collect();
        Recompiler::new(
            root.to_path_buf(),
            "app".to_string(),
            Resolver::new(&ResolverConfig::default()),
            specs,
            "chunk.[setHash].js".to_string(),
        )
    }

    #[test]
    fn build_produces_a_compilation_and_goes_idle() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("main.js"), "require('./lib');");
        write(&root.join("lib.js"), "x");

        let mut recompiler = recompiler(root, &["main"]);
        let mut sink = CollectedEvents::new();
        let result = recompiler.build(&mut sink).unwrap();

        assert_eq!(result.bundles.len(), 1);
        assert_eq!(result.artifacts.len(), 1);
        assert_eq!(recompiler.state(), CompileState::Idle);
        assert!(matches!(sink.events[0], CompileEvent::Patch { .. }));
        assert!(matches!(sink.events[1], CompileEvent::Completed { .. }));
    }

    #[test]
    fn invalidate_evicts_the_file_and_its_dependents() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("main.js"), "require('./mid');");
        write(&root.join("mid.js"), "require('./leaf');");
        write(&root.join("leaf.js"), "x");

        let mut recompiler = recompiler(root, &["main"]);
        let mut sink = CollectedEvents::new();
        recompiler.build(&mut sink).unwrap();
        assert_eq!(recompiler.graph().len(), 3);

        recompiler.invalidate(&root.join("leaf.js"), &mut sink);
        assert_eq!(recompiler.state(), CompileState::Invalidated);
        // The whole ancestor chain is gone; nothing else is.
        assert_eq!(recompiler.graph().len(), 0);
        match sink.events.last().unwrap() {
            CompileEvent::Invalidated { paths } => {
                assert_eq!(paths.len(), 3);
                assert_eq!(paths[0], root.join("leaf.js"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn invalidation_spares_unrelated_modules() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("a.js"), "require('./a_dep');");
        write(&root.join("a_dep.js"), "x");
        write(&root.join("b.js"), "y");

        let mut recompiler = recompiler(root, &["a", "b"]);
        let mut sink = CollectedEvents::new();
        recompiler.build(&mut sink).unwrap();
        assert_eq!(recompiler.graph().len(), 3);

        recompiler.invalidate(&root.join("a_dep.js"), &mut sink);
        assert!(recompiler.graph().contains(&root.join("b.js")));
        assert!(!recompiler.graph().contains(&root.join("a.js")));
    }

    #[test]
    fn builds_on_a_worker_pool() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("main.js"), "require('./lib');");
        write(&root.join("lib.js"), "x");

        let mut recompiler =
            recompiler(root, &["main"]).with_worker_pool(WorkerPool::new(2).unwrap());
        let mut sink = CollectedEvents::new();
        let result = recompiler.build(&mut sink).unwrap();
        assert_eq!(result.bundles.len(), 1);
    }

    #[test]
    fn panicking_stage_surfaces_as_a_worker_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("main.js"), "x");

        let mut recompiler =
            recompiler(root, &["main"]).with_worker_pool(WorkerPool::new(1).unwrap());
        recompiler
            .bundle_ops_mut()
            .render
            .override_with(|_, _| panic!("render exploded"));
        let mut sink = CollectedEvents::new();
        let err = recompiler.build(&mut sink).unwrap_err();
        assert!(matches!(err, CompileError::Worker(_)));
        // The pool contains the panic; the recompiler stays usable.
        assert_eq!(recompiler.state(), CompileState::Invalidated);
    }

    #[test]
    fn failed_rebuild_keeps_the_last_good_compilation() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("main.js"), "require('./lib');");
        write(&root.join("lib.js"), "x");

        let mut recompiler = recompiler(root, &["main"]);
        let mut sink = CollectedEvents::new();
        recompiler.build(&mut sink).unwrap();
        let good_dest = recompiler.last_good().unwrap().bundles[0].dest.clone();

        // Break the module and change it.
        write(&root.join("lib.js"), "var s = 'unterminated");
        let err = recompiler
            .on_file_change(&root.join("lib.js"), &mut sink)
            .unwrap_err();
        assert!(matches!(err, CompileError::Graph(_)));
        assert_eq!(recompiler.state(), CompileState::Invalidated);
        assert_eq!(recompiler.last_good().unwrap().bundles[0].dest, good_dest);
        assert!(matches!(
            sink.events.last().unwrap(),
            CompileEvent::Failed { .. }
        ));

        // Fixing the file recovers on the next change event.
        write(&root.join("lib.js"), "var s = 'ok';");
        recompiler
            .on_file_change(&root.join("lib.js"), &mut sink)
            .unwrap();
        assert_eq!(recompiler.state(), CompileState::Idle);
    }
}
