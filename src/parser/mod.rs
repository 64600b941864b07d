//! Parser module for mtree.
//!
//! This module turns build tool dependency reports into a
//! [`Graph`](crate::graph::Graph).
//!
//! # Supported Formats
//!
//! - **`mvn dependency:tree`** console output - Fully supported
//!
//! # Example
//!
//! ```rust
//! use mtree::parser::parse_tree;
//!
//! let output = "\
//! [INFO] --- dependency:3.6.0:tree (default-cli) @ app ---
//! [INFO] com.acme:app:jar:1.0
//! [INFO] +- com.acme:lib:jar:1.0:compile
//! [INFO]
//! ";
//!
//! let graph = parse_tree("app", output).unwrap();
//! assert_eq!(graph.node_count(), 2);
//! assert!(graph.has_edge(1, 2));
//! ```

pub mod maven;

pub use maven::{parse_tree, split_segments, TreeLine};
