//! Graphviz DOT export implementation.
//!
//! Serializes a graph into the text format consumed by `dot`: a header of
//! layout attributes, one statement per node, one per edge.

use super::Exporter;
use crate::graph::Graph;
use std::io::{self, Write};

const FONT: &str = "Helvetica,Arial,sans-serif";
const DEFAULT_SHAPE: &str = "box";

/// Graph-level layout attributes written into the DOT header.
#[derive(Debug, Clone, PartialEq)]
pub struct DotOptions {
    pub pad: String,
    pub rank_sep: String,
    pub node_sep: String,
    pub ratio: String,
    /// Output resolution, useful for raster formats
    pub dpi: Option<u32>,
    /// Layout engine override (e.g. "neato", "fdp")
    pub layout: Option<String>,
    /// Prefix node labels with their id
    pub display_id: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            pad: "0.3".to_string(),
            rank_sep: "0.5".to_string(),
            node_sep: "0.5".to_string(),
            ratio: "auto".to_string(),
            dpi: None,
            layout: None,
            display_id: true,
        }
    }
}

/// DOT exporter implementation.
#[derive(Debug, Clone, Default)]
pub struct DotExporter {
    options: DotOptions,
}

impl DotExporter {
    /// Creates an exporter that writes `options` into the graph header.
    pub fn new(options: DotOptions) -> Self {
        Self { options }
    }

    /// Escape a value for use inside a double-quoted DOT string.
    ///
    /// Newlines become the `\n` escape so multi-line labels stay centered.
    fn escape(value: &str) -> String {
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }

    fn write_header<W: Write>(&self, graph: &Graph, writer: &mut W) -> io::Result<()> {
        let opts = &self.options;
        writeln!(writer, "digraph \"[{}]\" {{", Self::escape(graph.title()))?;
        writeln!(writer, "pad={}", opts.pad)?;
        writeln!(writer, "ranksep={}", opts.rank_sep)?;
        writeln!(writer, "nodesep={}", opts.node_sep)?;
        writeln!(writer, "ratio=\"{}\"", Self::escape(&opts.ratio))?;
        if let Some(dpi) = opts.dpi {
            writeln!(writer, "dpi={}", dpi)?;
        }
        if let Some(layout) = &opts.layout {
            writeln!(writer, "layout=\"{}\"", Self::escape(layout))?;
        }
        writeln!(writer, "constraint=false")?;
        writeln!(writer, "overlap=false")?;
        writeln!(writer, "fontname=\"{}\"", FONT)?;
        writeln!(writer, "node [fontname=\"{}\"]", FONT)?;
        writeln!(writer, "edge [fontname=\"{}\"]", FONT)?;
        writeln!(writer, "node [style=filled fillcolor=\"#f8f8f8\"]")
    }
}

impl Exporter for DotExporter {
    fn export<W: Write>(&self, graph: &Graph, writer: &mut W) -> io::Result<()> {
        self.write_header(graph, writer)?;

        for node in graph.nodes() {
            let label = if self.options.display_id {
                format!("{}. {}", node.id, node.label)
            } else {
                node.label.clone()
            };
            writeln!(
                writer,
                "N{id} [label=\"{label}\" id=\"node{id}\" fontsize=8 shape={shape} tooltip=\"{tooltip}\" color=\"#b20400\" fillcolor=\"#edd6d5\"]",
                id = node.id,
                label = Self::escape(&label),
                shape = node.shape.as_deref().unwrap_or(DEFAULT_SHAPE),
                tooltip = Self::escape(node.tooltip.as_deref().unwrap_or_default()),
            )?;
        }

        for edge in graph.edges() {
            writeln!(
                writer,
                "N{} -> N{} [label=\" {}\" labelfloat=false fontsize=6 weight=1 color=\"#b2a999\" tooltip=\"{}\"]",
                edge.from,
                edge.to,
                Self::escape(edge.label.as_deref().unwrap_or_default()),
                Self::escape(edge.tooltip.as_deref().unwrap_or_default()),
            )?;
        }

        writeln!(writer, "}}")
    }
}
