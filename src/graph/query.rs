//! Read-only reachability queries: connectivity, subgraph extraction and
//! cycle detection.
//!
//! Dependency data is not guaranteed to be acyclic, so every traversal runs
//! on petgraph's visited-set based walkers.

use petgraph::algo::{has_path_connecting, tarjan_scc};
use petgraph::visit::Dfs;
use std::collections::HashSet;

use super::model::{Graph, GraphError, GraphResult, Node, NodeId};

impl Graph {
    /// Depth-first walk from `start`, calling `visit` once for every node
    /// reached (including `start`). Stops early and returns `true` as soon as
    /// `visit` returns `true`.
    pub(crate) fn walk<F>(&self, start: NodeId, mut visit: F) -> bool
    where
        F: FnMut(&Node) -> bool,
    {
        let Some(start) = self.index_of(start) else {
            return false;
        };
        let graph = self.inner();
        let mut dfs = Dfs::new(graph, start);

        while let Some(idx) = dfs.next(graph) {
            if visit(&graph[idx]) {
                return true;
            }
        }
        false
    }

    /// Ids of every node reachable from `root`, including `root` itself.
    ///
    /// Returns an empty vector if `root` does not exist.
    pub fn reachable(&self, root: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.walk(root, |node| {
            found.push(node.id);
            false
        });
        found
    }

    /// Returns true if a directed path leads from `root` to `target`.
    ///
    /// Every existing node reaches itself. A missing `root` is an ordinary
    /// negative answer, not an error.
    pub fn is_connected(&self, root: NodeId, target: NodeId) -> bool {
        match (self.index_of(root), self.index_of(target)) {
            (Some(from), Some(to)) => has_path_connecting(self.inner(), from, to, None),
            _ => false,
        }
    }

    /// Extracts the subgraph induced by everything reachable from `root`.
    ///
    /// All edges between included nodes are kept, not only the ones on the
    /// traversal tree. Node and edge order follow this graph.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if `root` does not exist.
    pub fn subgraph(&self, root: NodeId) -> GraphResult<Graph> {
        if !self.contains(root) {
            return Err(GraphError::NotFound(root));
        }

        let included: HashSet<NodeId> = self.reachable(root).into_iter().collect();
        let nodes = self
            .nodes()
            .filter(|node| included.contains(&node.id))
            .cloned()
            .collect();
        let edges = self
            .edges()
            .filter(|edge| included.contains(&edge.from) && included.contains(&edge.to))
            .cloned()
            .collect();

        Graph::new(self.title(), nodes, edges)
    }

    /// Detects dependency cycles.
    ///
    /// Each cycle is reported as the sorted ids of one strongly connected
    /// component with more than one node, or a single node with a self-loop.
    pub fn detect_cycles(&self) -> Vec<Vec<NodeId>> {
        let graph = self.inner();

        let mut cycles: Vec<Vec<NodeId>> = tarjan_scc(graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut ids: Vec<NodeId> = scc.into_iter().map(|idx| graph[idx].id).collect();
                ids.sort_unstable();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Returns true if any dependency cycle exists.
    pub fn has_cycles(&self) -> bool {
        !self.detect_cycles().is_empty()
    }
}
