//! Tree-shaking: drop every node whose whole dependency subtree fails a
//! predicate.

use std::collections::HashSet;
use tracing::{debug, info};

use super::model::{Graph, Node};

impl Graph {
    /// Removes every node for which neither the node itself nor anything
    /// reachable from it satisfies `keep`.
    ///
    /// Each node is checked with its own traversal, so cycles are safe and the
    /// question asked per node is "does this subtree contain a match?".
    /// Removed nodes take all edges touching them along. Returns the removed
    /// nodes in their original order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtree::graph::{Edge, Graph, Node};
    ///
    /// let nodes = vec![Node::with_id(1, "x-y"), Node::with_id(2, "z")];
    /// let mut graph = Graph::new("shake", nodes, vec![Edge::new(1, 2)]).unwrap();
    ///
    /// let removed = graph.tree_shake(|node| node.label.contains('-'));
    /// assert_eq!(removed.len(), 1);
    /// assert_eq!(removed[0].label, "z");
    /// assert!(graph.contains(1));
    /// ```
    pub fn tree_shake<F>(&mut self, mut keep: F) -> Vec<Node>
    where
        F: FnMut(&Node) -> bool,
    {
        let mut doomed = HashSet::new();
        let nodes: Vec<&Node> = self.nodes().collect();
        for node in nodes.into_iter().rev() {
            if !self.walk(node.id, &mut keep) {
                debug!(id = node.id, label = %node.label, "tree-shaking node");
                doomed.insert(node.id);
            }
        }

        let removed = self.remove_nodes(&doomed);
        info!(
            removed = removed.len(),
            remaining = self.node_count(),
            "tree-shake finished"
        );
        removed
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{Edge, Graph, Node, NodeId};

    fn labeled(nodes: &[(NodeId, &str)], edges: &[(NodeId, NodeId)]) -> Graph {
        let nodes = nodes
            .iter()
            .map(|&(id, label)| Node::with_id(id, label))
            .collect();
        let edges = edges.iter().map(|&(from, to)| Edge::new(from, to)).collect();
        Graph::new("shake", nodes, edges).unwrap()
    }

    fn ids(graph: &Graph) -> Vec<NodeId> {
        graph.nodes().map(|n| n.id).collect()
    }

    #[test]
    fn test_tree_shake_removes_unmatched_leaf() {
        let mut graph = labeled(&[(1, "x-y"), (2, "z")], &[(1, 2)]);

        let removed = graph.tree_shake(|n| n.label.contains('-'));

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, 2);
        assert_eq!(ids(&graph), vec![1]);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.dependencies(1).is_empty());
    }

    #[test]
    fn test_tree_shake_keeps_ancestors_of_matches() {
        // app -> web -> jackson, app -> log
        let mut graph = labeled(
            &[(1, "app"), (2, "web"), (3, "jackson"), (4, "log")],
            &[(1, 2), (2, 3), (1, 4)],
        );

        graph.tree_shake(|n| n.label == "jackson");

        assert_eq!(ids(&graph), vec![1, 2, 3]);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge(1, 2));
        assert!(graph.has_edge(2, 3));
    }

    #[test]
    fn test_tree_shake_handles_cycles() {
        // 1 -> 2 -> 3 -> 1 with no match anywhere in the cycle, 4 -> 1, 4 -> 5
        let mut graph = labeled(
            &[(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "match")],
            &[(1, 2), (2, 3), (3, 1), (4, 1), (4, 5)],
        );

        let removed = graph.tree_shake(|n| n.label == "match");

        assert_eq!(removed.len(), 3);
        assert_eq!(ids(&graph), vec![4, 5]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_tree_shake_cycle_reaching_match_survives() {
        let mut graph = labeled(
            &[(1, "a"), (2, "b"), (3, "match")],
            &[(1, 2), (2, 1), (2, 3)],
        );

        assert!(graph.tree_shake(|n| n.label == "match").is_empty());
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_tree_shake_is_idempotent() {
        let mut graph = labeled(
            &[
                (1, "app"),
                (2, "spring-web"),
                (3, "jackson"),
                (4, "log"),
                (5, "spring-core"),
                (6, "junit"),
            ],
            &[(1, 2), (2, 3), (1, 4), (4, 5), (3, 4), (1, 6)],
        );
        let keep = |n: &Node| n.label.starts_with("spring");

        graph.tree_shake(keep);
        let once = ids(&graph);
        assert_eq!(once, vec![1, 2, 3, 4, 5]);
        let removed = graph.tree_shake(keep);

        assert!(removed.is_empty());
        assert_eq!(ids(&graph), once);
    }

    #[test]
    fn test_tree_shake_nothing_matches() {
        let mut graph = labeled(&[(1, "a"), (2, "b")], &[(1, 2)]);

        let removed = graph.tree_shake(|_| false);

        assert_eq!(removed.len(), 2);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
