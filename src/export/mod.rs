//! Export functionality for dependency graphs.
//!
//! This module provides exporters for writing a [`Graph`] out in formats
//! other tools consume: Graphviz DOT for the layout engine and JSON for
//! scripting.

pub mod dot;
pub mod json;

pub use dot::{DotExporter, DotOptions};
pub use json::JsonExporter;

use crate::graph::Graph;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Graphviz DOT - input for the layout engine
    #[default]
    Dot,
    /// JSON format - machine-readable, full data
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" => Ok(ExportFormat::Dot),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: dot, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Dot => write!(f, "dot"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the graph to the given writer.
    fn export<W: Write>(&self, graph: &Graph, writer: &mut W) -> io::Result<()>;
}

/// Export a graph in the specified format.
///
/// `options` only affects DOT output.
pub fn export<W: Write>(
    format: ExportFormat,
    options: &DotOptions,
    graph: &Graph,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Dot => DotExporter::new(options.clone()).export(graph, writer),
        ExportFormat::Json => JsonExporter.export(graph, writer),
    }
}

/// Export a graph to a string.
pub fn export_to_string(
    format: ExportFormat,
    options: &DotOptions,
    graph: &Graph,
) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, options, graph, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
