//! Reverse dependency index over module paths.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;

/// Tracks which modules depend on which, keyed by absolute path.
///
/// Edges point from a dependency to its importer, so the transitive
/// dependents of a path are exactly the nodes reachable from it. A changed
/// file invalidates itself plus everything this index reaches from it:
/// module hashes incorporate dependency hashes, so every ancestor's hash is
/// stale the moment a descendant changes.
#[derive(Debug, Default)]
pub struct DependentIndex {
    graph: DiGraph<PathBuf, ()>,
    nodes: HashMap<PathBuf, NodeIndex>,
}

impl DependentIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, path: &Path) -> NodeIndex {
        if let Some(index) = self.nodes.get(path) {
            return *index;
        }
        let index = self.graph.add_node(path.to_path_buf());
        self.nodes.insert(path.to_path_buf(), index);
        index
    }

    /// Replaces the recorded dependencies of `importer` with `deps`.
    pub fn set_dependencies<'a>(
        &mut self,
        importer: &Path,
        deps: impl IntoIterator<Item = &'a Path>,
    ) {
        let importer_node = self.node(importer);
        // Drop the importer's old dependency edges before re-adding; the
        // rebuilt module may import a different set.
        self.graph.retain_edges(|graph, edge| {
            graph
                .edge_endpoints(edge)
                .map_or(true, |(_, target)| target != importer_node)
        });
        for dep in deps {
            let dep_node = self.node(dep);
            self.graph.update_edge(dep_node, importer_node, ());
        }
        self.prune_isolated();
    }

    /// Drops nodes left without any edge, so paths that permanently left the
    /// project stop participating in invalidation walks. Node removal
    /// reshuffles petgraph indexes, so the path map is rebuilt afterwards.
    fn prune_isolated(&mut self) {
        self.graph.retain_nodes(|graph, node| {
            graph.neighbors_undirected(node).next().is_some()
        });
        self.nodes = self
            .graph
            .node_indices()
            .map(|index| (self.graph[index].clone(), index))
            .collect();
    }

    /// The transitive dependents of `path`, excluding `path` itself.
    pub fn dependents_of(&self, path: &Path) -> Vec<PathBuf> {
        let Some(&start) = self.nodes.get(path) else {
            return Vec::new();
        };
        let mut dependents = Vec::new();
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(node) = bfs.next(&self.graph) {
            if node != start {
                dependents.push(self.graph[node].clone());
            }
        }
        dependents
    }

    /// The direct dependents of `path`.
    pub fn direct_dependents_of(&self, path: &Path) -> Vec<PathBuf> {
        let Some(&node) = self.nodes.get(path) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|neighbor| self.graph[neighbor].clone())
            .collect()
    }
}
