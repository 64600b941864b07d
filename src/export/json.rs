//! JSON export implementation.
//!
//! Exports a dependency graph in JSON format for machine-readable output.

use super::Exporter;
use crate::graph::{Graph, NodeId};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable node for JSON output.
#[derive(Serialize)]
struct JsonNode<'a> {
    id: NodeId,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shape: Option<&'a str>,
}

/// Serializable edge for JSON output.
#[derive(Serialize)]
struct JsonEdge<'a> {
    from: NodeId,
    to: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<&'a str>,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    nodes: usize,
    edges: usize,
    cycles: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    title: &'a str,
    summary: JsonSummary,
    nodes: Vec<JsonNode<'a>>,
    edges: Vec<JsonEdge<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cycles: Vec<Vec<NodeId>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &Graph, writer: &mut W) -> io::Result<()> {
        let nodes = graph
            .nodes()
            .map(|n| JsonNode {
                id: n.id,
                label: n.label.as_str(),
                tooltip: n.tooltip.as_deref(),
                shape: n.shape.as_deref(),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|e| JsonEdge {
                from: e.from,
                to: e.to,
                label: e.label.as_deref(),
                tooltip: e.tooltip.as_deref(),
            })
            .collect();

        let cycles = graph.detect_cycles();

        let export = JsonExport {
            title: graph.title(),
            summary: JsonSummary {
                nodes: graph.node_count(),
                edges: graph.edge_count(),
                cycles: cycles.len(),
            },
            nodes,
            edges,
            cycles,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
