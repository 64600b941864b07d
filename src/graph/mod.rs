//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`Graph`] model with its structural invariants,
//! the key-deduplicating [`GraphBuilder`], reachability queries and
//! tree-shaking.
//!
//! # Example
//!
//! ```rust
//! use mtree::graph::{GraphBuilder, Node};
//!
//! let builder = GraphBuilder::new();
//! builder.add("app", Node::new("app"));
//! builder.add("web", Node::new("spring-web"));
//! builder.add("log", Node::new("logback"));
//! builder.connect("app", "web");
//! builder.connect("app", "log");
//!
//! let mut graph = builder.build("app dependencies").unwrap();
//! assert!(graph.is_connected(1, 3));
//!
//! graph.tree_shake(|node| node.label.contains("spring"));
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod builder;
mod model;
mod query;
mod shake;

pub use builder::GraphBuilder;
pub use model::{Edge, Graph, GraphError, GraphResult, Node, NodeId};
