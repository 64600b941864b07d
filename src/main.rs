use anyhow::{Context, Result};
use clap::Parser;
use mtree::export::{self, DotOptions, ExportFormat};
use mtree::graph::{Graph, Node};
use mtree::{input, parser, render};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mtree")]
#[command(version)]
#[command(about = "Render Maven dependency:tree output as a dependency graph", long_about = None)]
struct Cli {
    /// Saved `mvn dependency:tree` output file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// pom.xml to run `mvn dependency:tree` against when no other input is given
    #[arg(short, long)]
    pom: Option<PathBuf>,

    /// Keep only branches leading to a node whose label contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Only draw what the first node whose label contains this text depends on
    #[arg(long)]
    root: Option<String>,

    /// Image format passed to Graphviz (svg, png, pdf, ...)
    #[arg(long, default_value = "png")]
    format: String,

    /// Graph description format to write (dot, json); json skips rendering
    #[arg(long, default_value = "dot")]
    emit: ExportFormat,

    /// Where to write the graph description
    #[arg(short, long, default_value = "generated-graph.txt")]
    output: PathBuf,

    /// Where to write the rendered image (defaults to a temp file)
    #[arg(long)]
    image: Option<PathBuf>,

    /// Do not open the rendered image
    #[arg(long)]
    no_open: bool,

    /// Minimum distance between ranks
    #[arg(long = "ranksep", default_value = "0.5")]
    rank_sep: String,

    /// Minimum distance between nodes in the same rank
    #[arg(long = "nodesep", default_value = "0.5")]
    node_sep: String,

    /// Aspect ratio handling (auto, fill, compress, or a number)
    #[arg(long, default_value = "auto")]
    ratio: String,

    /// Padding around the drawing, in inches
    #[arg(long, default_value = "0.3")]
    pad: String,

    /// Graphviz layout engine (dot, neato, fdp, ...)
    #[arg(long)]
    layout: Option<String>,

    /// Do not prefix node labels with their id
    #[arg(long)]
    hide_ids: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn dot_options(&self) -> DotOptions {
        DotOptions {
            pad: self.pad.clone(),
            rank_sep: self.rank_sep.clone(),
            node_sep: self.node_sep.clone(),
            ratio: self.ratio.clone(),
            // Raster output is unreadable at the default 72 dpi.
            dpi: (self.format != "svg").then_some(300),
            layout: self.layout.clone(),
            display_id: !self.hide_ids,
        }
    }

    fn title(&self) -> String {
        match &self.file {
            Some(path) => format!("dependency graph {}", path.display()),
            None => "dependency graph".to_string(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Narrows `graph` to the subgraph under the first node matching `text`.
fn select_root(graph: &Graph, text: &str) -> Result<Graph> {
    let root = graph
        .find_by_label(text)
        .first()
        .map(|node| node.id)
        .with_context(|| format!("no node label contains '{}'", text))?;
    Ok(graph.subgraph(root)?)
}

/// Tree-shakes `graph` down to branches leading to a label containing `text`
/// and logs what was dropped.
fn apply_filter(graph: &mut Graph, text: &str) -> Vec<Node> {
    let removed = graph.tree_shake(|node| node.label.contains(text));
    for node in &removed {
        debug!(
            id = node.id,
            coordinate = node.tooltip.as_deref().unwrap_or(&node.label),
            "filtered out"
        );
    }
    info!(filter = text, removed = removed.len(), "applied filter");
    removed
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let content = input::collect(cli.file.as_deref(), cli.pom.as_deref())
        .context("failed to read dependency tree")?;

    let mut graph =
        parser::parse_tree(&cli.title(), &content).context("failed to build dependency graph")?;

    if let Some(root) = &cli.root {
        graph = select_root(&graph, root)?;
    }
    if let Some(filter) = &cli.filter {
        apply_filter(&mut graph, filter);
    }
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph ready"
    );

    let cycles = graph.detect_cycles();
    if !cycles.is_empty() {
        warn!(count = cycles.len(), "dependency cycles detected");
    }

    let file = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut writer = BufWriter::new(file);
    export::export(cli.emit, &cli.dot_options(), &graph, &mut writer)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    writer.flush()?;

    if cli.emit == ExportFormat::Json {
        println!("Graph description written to: {}", cli.output.display());
        return Ok(());
    }

    let image = cli
        .image
        .clone()
        .unwrap_or_else(|| render::default_image_path(&cli.format));
    render::render(&cli.output, &image, &cli.format).context("failed to render graph")?;
    println!("Graph file generated at: {}", image.display());

    if !cli.no_open {
        render::open_file(&image).context("failed to open rendered graph")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtree::graph::Edge;

    fn sample_graph() -> Graph {
        let nodes = vec![
            Node::with_id(1, "com.acme\napp\njar:1.0").with_tooltip("com.acme:app:jar:1.0"),
            Node::with_id(2, "com.fasterxml\njackson-core\njar:2.15.3")
                .with_tooltip("com.fasterxml:jackson-core:jar:2.15.3"),
            Node::with_id(3, "junit\njunit\njar:4.13.2").with_tooltip("junit:junit:jar:4.13.2"),
        ];
        let edges = vec![Edge::new(1, 2), Edge::new(1, 3)];
        Graph::new("app", nodes, edges).unwrap()
    }

    #[test]
    fn test_apply_filter_returns_removed_nodes() {
        let mut graph = sample_graph();

        let removed = apply_filter(&mut graph, "jackson");

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].tooltip.as_deref(), Some("junit:junit:jar:4.13.2"));
        assert_eq!(graph.node_count(), 2);
        assert!(graph.has_edge(1, 2));
    }

    #[test]
    fn test_select_root() {
        let graph = sample_graph();

        let sub = select_root(&graph, "jackson").unwrap();
        assert_eq!(sub.node_count(), 1);
        assert!(select_root(&graph, "missing").is_err());
    }
}
