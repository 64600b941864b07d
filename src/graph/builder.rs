//! Key-deduplicating graph builder.
//!
//! Nodes are registered under a caller-chosen string key (for the Maven parser
//! this is the full `group:artifact:packaging:version` coordinate) and
//! connections are recorded between keys. Ids are only resolved when the
//! graph is built.
//!
//! A [`GraphBuilder`] can be shared between producer threads behind an `Arc`:
//! every call takes the internal lock for its whole read-modify-write
//! sequence.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use super::model::{Edge, Graph, GraphResult, Node, NodeId};

/// A connection recorded between two keys, not yet resolved to node ids.
#[derive(Debug, Clone, Copy)]
struct PendingEdge<'a> {
    from: &'a str,
    to: &'a str,
    label: Option<&'a str>,
}

impl PendingEdge<'_> {
    /// Resolves both keys to node ids, or `None` if either was never added.
    fn resolve(&self, nodes: &HashMap<String, Node>) -> Option<Edge> {
        let from = nodes.get(self.from)?;
        let to = nodes.get(self.to)?;
        let mut edge = Edge::new(from.id, to.id);
        edge.label = self.label.map(str::to_string);
        Some(edge)
    }
}

#[derive(Debug, Default)]
struct BuilderState {
    last_id: NodeId,
    keyed_nodes: HashMap<String, Node>,
    /// Source key -> target key -> edge label
    pending: HashMap<String, HashMap<String, Option<String>>>,
    /// Key of the most recent `add`, for chained construction
    last_key: Option<String>,
}

impl BuilderState {
    fn add(&mut self, key: String, mut node: Node) -> (Node, bool) {
        if let Some(existing) = self.keyed_nodes.get(&key) {
            let existing = existing.clone();
            self.last_key = Some(key);
            return (existing, false);
        }

        self.last_id += 1;
        node.id = self.last_id;
        self.keyed_nodes.insert(key.clone(), node.clone());
        self.last_key = Some(key);
        (node, true)
    }

    fn connect(&mut self, from: String, to: String, label: Option<String>) {
        let label = label.filter(|l| !l.trim().is_empty());
        let slot = self.pending.entry(from).or_default().entry(to).or_default();
        if label.is_some() {
            *slot = label;
        }
    }
}

/// Builds a [`Graph`] from string-keyed nodes and connections.
///
/// # Example
///
/// ```rust
/// use mtree::graph::{GraphBuilder, Node};
///
/// let builder = GraphBuilder::new();
/// builder.add("fstore", Node::new("fstore"));
/// builder.add("vfm", Node::new("vfm"));
/// builder.connect("vfm", "fstore");
/// builder.connect("vfm", "not-registered"); // dropped at build time
///
/// let graph = builder.build("services").unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    state: RwLock<BuilderState>,
}

impl GraphBuilder {
    /// Creates an empty builder. Ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BuilderState> {
        // Each call leaves the state consistent, so a poisoned lock is still usable.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BuilderState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `node` under `key`.
    ///
    /// If the key is already registered the stored node is returned unchanged
    /// together with `false`; the given node is discarded. Otherwise the node
    /// gets the next sequential id and `true` is returned. The id carried by
    /// `node` is always ignored.
    pub fn add(&self, key: impl Into<String>, node: Node) -> (Node, bool) {
        self.write().add(key.into(), node)
    }

    /// Registers `node` under `key` and connects the previously added key to
    /// it, which makes linear chains easy to build.
    ///
    /// Nothing is connected for the very first node, or when the previous key
    /// is `key` itself.
    pub fn add_chained(&self, key: impl Into<String>, node: Node) -> (Node, bool) {
        let key = key.into();
        let mut state = self.write();
        let previous = state.last_key.clone();
        let added = state.add(key.clone(), node);
        if let Some(previous) = previous.filter(|p| *p != key) {
            state.connect(previous, key, None);
        }
        added
    }

    /// Records a connection `from -> to` between two keys.
    ///
    /// The keys need not be registered yet; unknown keys are dropped when the
    /// graph is built.
    pub fn connect(&self, from: impl Into<String>, to: impl Into<String>) {
        self.write().connect(from.into(), to.into(), None);
    }

    /// Records a labeled connection `from -> to`.
    ///
    /// A non-blank label replaces any earlier label for the same pair; a blank
    /// one never erases it.
    pub fn connect_labeled(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
    ) {
        self.write()
            .connect(from.into(), to.into(), Some(label.into()));
    }

    /// Looks up the node registered under `key`.
    pub fn find(&self, key: &str) -> Option<Node> {
        self.read().keyed_nodes.get(key).cloned()
    }

    /// All registered nodes, ordered by id.
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.read().keyed_nodes.values().cloned().collect();
        nodes.sort_by_key(|node| node.id);
        nodes
    }

    /// Number of distinct keys registered so far.
    pub fn len(&self) -> usize {
        self.read().keyed_nodes.len()
    }

    /// Returns true if no key has been registered.
    pub fn is_empty(&self) -> bool {
        self.read().keyed_nodes.is_empty()
    }

    /// Resolves all pending connections and builds the graph.
    ///
    /// Connections whose keys were never added are silently dropped. Nodes are
    /// ordered by id and edges by `(from, to)`.
    pub fn build(&self, title: impl Into<String>) -> GraphResult<Graph> {
        let state = self.read();

        let mut nodes: Vec<Node> = state.keyed_nodes.values().cloned().collect();
        nodes.sort_by_key(|node| node.id);

        let mut edges = Vec::new();
        for (from, targets) in &state.pending {
            for (to, label) in targets {
                let pending = PendingEdge {
                    from: from.as_str(),
                    to: to.as_str(),
                    label: label.as_deref(),
                };
                match pending.resolve(&state.keyed_nodes) {
                    Some(edge) => edges.push(edge),
                    None => debug!(from = %from, to = %to, "dropping connection to unregistered key"),
                }
            }
        }
        edges.sort_by_key(|edge| (edge.from, edge.to));
        drop(state);

        let graph = Graph::new(title, nodes, edges)?;
        info!(
            title = graph.title(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph built"
        );
        Ok(graph)
    }
}
