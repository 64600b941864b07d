//! Node, edge and graph types.
//!
//! A [`Graph`] stores its nodes and edges in a petgraph [`StableDiGraph`],
//! with a map from [`NodeId`] to petgraph [`NodeIndex`] beside it. Every
//! structural change goes through methods that keep the map in step with the
//! graph.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::{HashMap, HashSet};

/// Identifier of a node within a [`Graph`].
///
/// Ids are positive and assigned by [`GraphBuilder`](super::GraphBuilder) or
/// the tree parser in first-seen order, starting at 1.
pub type NodeId = usize;

/// Errors raised when graph invariants are violated or a node is missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two nodes share the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    /// The same directed edge was declared twice.
    #[error("duplicate edge from node {from} to node {to}")]
    DuplicateEdge { from: NodeId, to: NodeId },

    /// An edge references a node id that was never declared.
    #[error("edge from node {from} to node {to} references an unknown node")]
    UnknownNode { from: NodeId, to: NodeId },

    /// A requested root node does not exist.
    #[error("node {0} not found")]
    NotFound(NodeId),
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// A single artifact in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    /// Unique id within the owning graph
    pub id: NodeId,
    /// Display label, not required to be unique
    pub label: String,
    /// Hover text for renderers that support it
    pub tooltip: Option<String>,
    /// Renderer shape hint (e.g. "box", "ellipse")
    pub shape: Option<String>,
}

impl Node {
    /// Creates a node with an unassigned id.
    ///
    /// The id is filled in by the builder when the node is registered.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Creates a node with an explicit id, for assembling a graph directly.
    pub fn with_id(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the hover text shown by renderers that support it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtree::graph::Node;
    ///
    /// let node = Node::new("com.acme\napp\njar:1.0").with_tooltip("com.acme:app:jar:1.0");
    /// assert_eq!(node.tooltip.as_deref(), Some("com.acme:app:jar:1.0"));
    /// ```
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Sets the renderer shape hint. Nodes without one are drawn as boxes.
    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }
}

/// A directed dependency: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// The depending node
    pub from: NodeId,
    /// The node depended upon
    pub to: NodeId,
    pub label: Option<String>,
    pub tooltip: Option<String>,
}

impl Edge {
    /// Creates an unlabeled edge.
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            label: None,
            tooltip: None,
        }
    }

    /// Sets the text drawn next to the edge.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the edge hover text.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

/// A directed dependency graph.
///
/// Nodes and edges keep their insertion order, which is also the order
/// exporters emit them in.
///
/// # Example
///
/// ```rust
/// use mtree::graph::{Edge, Graph, Node};
///
/// let nodes = vec![Node::with_id(1, "app"), Node::with_id(2, "lib")];
/// let graph = Graph::new("deps", nodes, vec![Edge::new(1, 2)]).unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.dependencies(1), vec![2]);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    title: String,
    graph: StableDiGraph<Node, Edge>,
    /// Node id -> petgraph index
    node_indices: HashMap<NodeId, NodeIndex>,
}

impl Graph {
    /// Builds a graph and validates its invariants.
    ///
    /// # Arguments
    ///
    /// * `title` - Graph title, used as the DOT graph name
    /// * `nodes` - Nodes in the order they should be emitted
    /// * `edges` - Edges between those nodes, in emission order
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNodeId`] when two nodes share an id,
    /// [`GraphError::UnknownNode`] when an edge points at an undeclared id and
    /// [`GraphError::DuplicateEdge`] when a directed edge appears twice.
    pub fn new(title: impl Into<String>, nodes: Vec<Node>, edges: Vec<Edge>) -> GraphResult<Self> {
        let mut graph = Self {
            title: title.into(),
            graph: StableDiGraph::with_capacity(nodes.len(), edges.len()),
            node_indices: HashMap::with_capacity(nodes.len()),
        };

        for node in nodes {
            let id = node.id;
            if !graph.add_node(node) {
                return Err(GraphError::DuplicateNodeId(id));
            }
        }

        for edge in edges {
            let (from, to) = (edge.from, edge.to);
            if !graph.contains(from) || !graph.contains(to) {
                return Err(GraphError::UnknownNode { from, to });
            }
            if !graph.add_edge(edge) {
                return Err(GraphError::DuplicateEdge { from, to });
            }
        }

        Ok(graph)
    }

    /// The graph title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edge_indices().map(move |idx| &self.graph[idx])
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Returns true if a node with this id exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_indices.contains_key(&id)
    }

    /// The petgraph index backing `id`.
    pub(crate) fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_indices.get(&id).copied()
    }

    /// The underlying petgraph storage, for traversal algorithms.
    pub(crate) fn inner(&self) -> &StableDiGraph<Node, Edge> {
        &self.graph
    }

    /// Ids of the direct dependencies of `id`, in edge insertion order.
    ///
    /// Returns an empty vector for unknown ids and for leaf nodes.
    pub fn dependencies(&self, id: NodeId) -> Vec<NodeId> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        // petgraph yields the most recently added edge first.
        let mut deps: Vec<NodeId> = self
            .graph
            .edges(idx)
            .map(|edge| edge.weight().to)
            .collect();
        deps.reverse();
        deps
    }

    /// Returns true if the directed edge `from -> to` exists.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Finds nodes whose label contains `text`, in insertion order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtree::graph::{Graph, Node};
    ///
    /// let nodes = vec![Node::with_id(1, "spring-core"), Node::with_id(2, "junit")];
    /// let graph = Graph::new("deps", nodes, Vec::new()).unwrap();
    ///
    /// assert_eq!(graph.find_by_label("spring")[0].id, 1);
    /// ```
    pub fn find_by_label(&self, text: &str) -> Vec<&Node> {
        self.nodes()
            .filter(|node| node.label.contains(text))
            .collect()
    }

    /// Adds a node.
    ///
    /// Returns `false` without touching the graph if the id is already taken.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtree::graph::{Graph, Node};
    ///
    /// let mut graph = Graph::new("deps", vec![Node::with_id(1, "app")], Vec::new()).unwrap();
    ///
    /// assert!(graph.add_node(Node::with_id(2, "lib")));
    /// assert!(!graph.add_node(Node::with_id(2, "impostor")));
    /// assert_eq!(graph.node(2).unwrap().label, "lib");
    /// ```
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.contains(node.id) {
            return false;
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id, idx);
        true
    }

    /// Adds an edge.
    ///
    /// Returns `false` without touching the graph if either endpoint is
    /// unknown or the directed edge already exists.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let (Some(from), Some(to)) = (self.index_of(edge.from), self.index_of(edge.to)) else {
            return false;
        };
        if self.graph.contains_edge(from, to) {
            return false;
        }
        self.graph.add_edge(from, to, edge);
        true
    }

    /// Adds an unlabeled edge `from -> to`. See [`Graph::add_edge`].
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        self.add_edge(Edge::new(from, to))
    }

    /// Removes every node in `doomed` together with all edges touching them.
    ///
    /// Returns the removed nodes in their original order.
    pub(crate) fn remove_nodes(&mut self, doomed: &HashSet<NodeId>) -> Vec<Node> {
        if doomed.is_empty() {
            return Vec::new();
        }

        let targets: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| doomed.contains(&self.graph[idx].id))
            .collect();
        let removed: Vec<Node> = targets
            .into_iter()
            .filter_map(|idx| self.graph.remove_node(idx))
            .collect();
        self.compact();

        removed
    }

    /// Closes the holes left by removals so later insertions append at the
    /// end, then rebuilds the id map.
    fn compact(&mut self) {
        let dense: petgraph::Graph<Node, Edge> = std::mem::take(&mut self.graph).into();
        self.graph = StableDiGraph::from(dense);
        self.node_indices = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].id, idx))
            .collect();
    }
}
