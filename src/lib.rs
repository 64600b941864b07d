//! mtree - Maven dependency tree to Graphviz graph
//!
//! This crate parses `mvn dependency:tree` output into a directed dependency
//! graph, supports tree-shaking and reachability queries over it, and
//! exports it for the Graphviz layout engine.

pub mod export;
pub mod graph;
pub mod input;
pub mod parser;
pub mod render;
