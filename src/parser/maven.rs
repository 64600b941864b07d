//! Parser for `mvn dependency:tree` console output.
//!
//! Maven prints each module's tree between a plugin banner and a blank
//! `[INFO]` line, with depth encoded by tree-drawing glyphs:
//!
//! ```text
//! [INFO] --- dependency:3.6.0:tree (default-cli) @ app ---
//! [INFO] com.acme:app:jar:1.0
//! [INFO] +- com.acme:lib:jar:1.0:compile
//! [INFO] |  \- org.slf4j:slf4j-api:jar:2.0.9:compile
//! [INFO] \- junit:junit:jar:4.13.2:test
//! [INFO]
//! ```
//!
//! Everything outside those segments is ignored.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::graph::{Graph, GraphBuilder, GraphResult, Node, NodeId};

/// Prefix of every line Maven's console logger prints at info level.
const REPORT_PREFIX: &str = "[INFO]";

/// Banners that open a dependency tree segment.
const TREE_START_MARKERS: [&str; 2] = [
    "[INFO] --- dependency:",
    "[INFO] --- maven-dependency-plugin:",
];

/// Separator line that closes a segment (e.g. the reactor summary).
const SEPARATOR_PREFIX: &str = "[INFO] ----";

/// Width of one indentation level in the tree drawing (`+- `, `|  `, `\- `).
///
/// Tied to Maven's output format; a different width would silently shift
/// parent/child attribution.
pub const INDENT_WIDTH: usize = 3;

/// Scope suffixes stripped from coordinates. Scope is not kept on nodes.
const SCOPES: [&str; 4] = [":compile", ":test", ":provided", ":runtime"];

/// One dependency line of a tree segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLine<'a> {
    /// Indentation level, 0 for the segment's root artifact
    pub depth: usize,
    /// Coordinate with the scope suffix removed
    pub coordinate: &'a str,
}

/// Splits raw Maven output into dependency tree segments.
///
/// Each segment holds the raw `[INFO]` lines between a tree banner and the
/// next blank `[INFO]` line or separator. A segment still open at the end of
/// the input is kept.
pub fn split_segments(input: &str) -> Vec<Vec<&str>> {
    let mut segments = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in input.lines() {
        if !line.starts_with(REPORT_PREFIX) {
            continue;
        }

        if TREE_START_MARKERS.iter().any(|m| line.starts_with(m)) {
            if let Some(open) = current.take() {
                segments.push(open);
            }
            current = Some(Vec::new());
            continue;
        }

        let Some(open) = current.as_mut() else {
            continue;
        };
        if line.trim() == REPORT_PREFIX || line.starts_with(SEPARATOR_PREFIX) {
            segments.extend(current.take());
            continue;
        }
        open.push(line);
    }

    segments.extend(current);
    segments
}

/// Parses a single report line into its depth and coordinate.
///
/// Returns `None` for blank lines and lines without the report prefix.
///
/// # Example
///
/// ```
/// use mtree::parser::maven::parse_line;
///
/// let line = parse_line("[INFO] |  \\- org.slf4j:slf4j-api:jar:2.0.9:compile").unwrap();
/// assert_eq!(line.depth, 2);
/// assert_eq!(line.coordinate, "org.slf4j:slf4j-api:jar:2.0.9");
/// ```
pub fn parse_line(line: &str) -> Option<TreeLine<'_>> {
    let body = line.trim().strip_prefix(REPORT_PREFIX)?;
    let body = body.strip_prefix(' ').unwrap_or(body);

    let indent = body
        .chars()
        .take_while(|c| matches!(c, '+' | '-' | '|' | '\\' | ' '))
        .count();
    // Tree glyphs are ASCII, so the char count is also the byte offset.
    let coordinate = strip_scope(&body[indent..]);
    if coordinate.is_empty() {
        return None;
    }

    Some(TreeLine {
        depth: indent / INDENT_WIDTH,
        coordinate,
    })
}

/// Removes a trailing dependency scope such as `:compile`.
pub fn strip_scope(coordinate: &str) -> &str {
    SCOPES
        .iter()
        .find_map(|scope| coordinate.strip_suffix(scope))
        .unwrap_or(coordinate)
}

/// Builds a compact multi-line label from a coordinate.
///
/// `com.acme:lib:jar:1.0` becomes `"com.acme\nlib\njar:1.0"`.
pub fn node_label(coordinate: &str) -> String {
    let mut fields = coordinate.split(':');
    let mut label = fields.next().unwrap_or_default().to_string();

    if let Some(artifact) = fields.next() {
        label.push('\n');
        label.push_str(artifact);
    }

    let rest: Vec<&str> = fields.collect();
    if !rest.is_empty() {
        label.push('\n');
        label.push_str(&rest.join(":"));
    }
    label
}

/// A distinct coordinate seen while parsing.
#[derive(Debug)]
struct Entry {
    id: NodeId,
    name: String,
    /// Depth at which the coordinate was last seen
    layer: usize,
    /// Direct dependencies, deduplicated, in first-seen order
    dependencies: Vec<String>,
}

#[derive(Debug, Default)]
struct TreeParser {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
}

impl TreeParser {
    /// Returns the entry index for `name`, creating the entry on first sight.
    fn entry(&mut self, name: &str, layer: usize) -> usize {
        if let Some(&idx) = self.by_name.get(name) {
            self.entries[idx].layer = layer;
            return idx;
        }

        let idx = self.entries.len();
        self.entries.push(Entry {
            id: idx + 1,
            name: name.to_string(),
            layer,
            dependencies: Vec::new(),
        });
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    fn add_dependency(&mut self, parent: usize, name: &str) {
        let deps = &mut self.entries[parent].dependencies;
        if !deps.iter().any(|d| d == name) {
            deps.push(name.to_string());
        }
    }

    fn parse_segment(&mut self, lines: &[&str]) {
        // Open parents as (entry index, depth of the line that opened them).
        // The segment's first line is never popped: it parents any later line
        // that dedents back to its level.
        let mut parents: Vec<(usize, usize)> = Vec::new();

        for line in lines.iter().filter_map(|l| parse_line(l)) {
            while parents.len() > 1
                && parents
                    .last()
                    .is_some_and(|&(_, depth)| depth >= line.depth)
            {
                parents.pop();
            }
            if let Some(&(parent, _)) = parents.last() {
                self.add_dependency(parent, line.coordinate);
            }

            let idx = self.entry(line.coordinate, line.depth);
            parents.push((idx, line.depth));
        }
    }

    fn into_graph(self, title: &str) -> GraphResult<Graph> {
        let builder = GraphBuilder::new();

        for entry in &self.entries {
            trace!(id = entry.id, layer = entry.layer, name = %entry.name, "dependency entry");
            let node = Node::new(node_label(&entry.name)).with_tooltip(entry.name.as_str());
            builder.add(entry.name.as_str(), node);
        }
        for entry in &self.entries {
            for dep in &entry.dependencies {
                builder.connect(entry.name.as_str(), dep.as_str());
            }
        }

        builder.build(title)
    }
}

/// Parses `mvn dependency:tree` output into a dependency graph.
///
/// Coordinates are deduplicated across all segments: an artifact reached from
/// several modules or parents becomes one node with several incoming edges.
/// Node ids follow first appearance, starting at 1.
///
/// # Arguments
///
/// * `title` - Title of the resulting graph
/// * `input` - Raw Maven output; lines outside tree segments are ignored
///
/// # Errors
///
/// Only fails if the assembled graph violates a [`Graph`] invariant, which
/// deduplicated parser output never does.
pub fn parse_tree(title: &str, input: &str) -> GraphResult<Graph> {
    let segments = split_segments(input);
    let mut parser = TreeParser::default();

    for (i, segment) in segments.iter().enumerate() {
        parser.parse_segment(segment);
        debug!(segment = i, lines = segment.len(), "parsed dependency tree segment");
    }

    parser.into_graph(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "[INFO] --- dependency:3.6.0:tree (default-cli) @ app ---\n\
                          [INFO] com.acme:app:jar:1.0\n\
                          [INFO] +- com.acme:lib:jar:1.0:compile\n\
                          [INFO] \n";

    fn id_of(graph: &Graph, coordinate: &str) -> NodeId {
        graph
            .nodes()
            .find(|n| n.tooltip.as_deref() == Some(coordinate))
            .map(|n| n.id)
            .unwrap()
    }

    #[test]
    fn test_parse_simple_tree() {
        let graph = parse_tree("simple", SIMPLE).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let app = id_of(&graph, "com.acme:app:jar:1.0");
        let lib = id_of(&graph, "com.acme:lib:jar:1.0");
        assert!(graph.has_edge(app, lib));
        assert_eq!(graph.node(lib).unwrap().label, "com.acme\nlib\njar:1.0");
    }

    #[test]
    fn test_parse_line_depths() {
        let root = parse_line("[INFO] com.acme:app:jar:1.0").unwrap();
        assert_eq!(root.depth, 0);

        let first = parse_line("[INFO] +- com.acme:lib:jar:1.0:compile").unwrap();
        assert_eq!(first.depth, 1);
        assert_eq!(first.coordinate, "com.acme:lib:jar:1.0");

        let nested = parse_line("[INFO] |  |  \\- org.ow2.asm:asm:jar:9.5:runtime").unwrap();
        assert_eq!(nested.depth, 3);
        assert_eq!(nested.coordinate, "org.ow2.asm:asm:jar:9.5");

        let last = parse_line("[INFO]    \\- junit:junit:jar:4.13.2:test").unwrap();
        assert_eq!(last.depth, 2);
    }

    #[test]
    fn test_parse_line_rejects_noise() {
        assert!(parse_line("[INFO]").is_none());
        assert!(parse_line("[INFO]    ").is_none());
        assert!(parse_line("Downloading from central: https://repo").is_none());
    }

    #[test]
    fn test_parse_line_handles_crlf() {
        let line = parse_line("[INFO] +- com.acme:lib:jar:1.0:provided\r").unwrap();
        assert_eq!(line.coordinate, "com.acme:lib:jar:1.0");
    }

    #[test]
    fn test_strip_scope() {
        assert_eq!(strip_scope("a:b:jar:1.0:compile"), "a:b:jar:1.0");
        assert_eq!(strip_scope("a:b:jar:1.0:test"), "a:b:jar:1.0");
        assert_eq!(strip_scope("a:b:jar:1.0:provided"), "a:b:jar:1.0");
        assert_eq!(strip_scope("a:b:jar:1.0:runtime"), "a:b:jar:1.0");
        assert_eq!(strip_scope("a:b:jar:1.0:system"), "a:b:jar:1.0:system");
        assert_eq!(strip_scope("a:b:jar:1.0"), "a:b:jar:1.0");
    }

    #[test]
    fn test_node_label() {
        assert_eq!(node_label("com.acme:lib:jar:1.0"), "com.acme\nlib\njar:1.0");
        assert_eq!(
            node_label("io.netty:netty-transport:jar:linux-x86_64:4.1.100"),
            "io.netty\nnetty-transport\njar:linux-x86_64:4.1.100"
        );
        assert_eq!(node_label("com.acme:lib"), "com.acme\nlib");
        assert_eq!(node_label("standalone"), "standalone");
    }

    #[test]
    fn test_split_segments() {
        let input = "\
[INFO] Scanning for projects...
[INFO] --- dependency:3.6.0:tree (default-cli) @ core ---
[INFO] com.acme:core:jar:1.0
[WARNING] something unrelated
[INFO] \\- org.slf4j:slf4j-api:jar:2.0.9:compile
[INFO]
[INFO] Some noise between modules
[INFO] --- maven-dependency-plugin:2.8:tree (default-cli) @ web ---
[INFO] com.acme:web:jar:1.0
[INFO] ------------------------------------------------------------------------
[INFO] BUILD SUCCESS
";
        let segments = split_segments(input);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[0][1], "[INFO] \\- org.slf4j:slf4j-api:jar:2.0.9:compile");
        assert_eq!(segments[1], vec!["[INFO] com.acme:web:jar:1.0"]);
    }

    #[test]
    fn test_split_segments_keeps_unterminated_segment() {
        let input = "[INFO] --- dependency:3.6.0:tree @ app ---\n[INFO] com.acme:app:jar:1.0";
        let segments = split_segments(input);
        assert_eq!(segments, vec![vec!["[INFO] com.acme:app:jar:1.0"]]);
    }

    #[test]
    fn test_empty_segment_is_harmless() {
        let input = "\
[INFO] --- dependency:3.6.0:tree @ empty ---
[INFO]
[INFO] --- dependency:3.6.0:tree @ app ---
[INFO] com.acme:app:jar:1.0
[INFO] +- com.acme:lib:jar:1.0:compile
[INFO]
";
        let graph = parse_tree("mixed", input).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_siblings_and_nesting() {
        let input = "\
[INFO] --- dependency:3.6.0:tree @ app ---
[INFO] com.acme:app:jar:1.0
[INFO] +- org.springframework:spring-web:jar:6.1.0:compile
[INFO] |  +- org.springframework:spring-beans:jar:6.1.0:compile
[INFO] |  \\- io.micrometer:micrometer-observation:jar:1.12.0:compile
[INFO] |     \\- io.micrometer:micrometer-commons:jar:1.12.0:compile
[INFO] +- ch.qos.logback:logback-classic:jar:1.4.11:compile
[INFO] \\- junit:junit:jar:4.13.2:test
[INFO]
";
        let graph = parse_tree("nesting", input).unwrap();
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 6);

        let app = id_of(&graph, "com.acme:app:jar:1.0");
        let web = id_of(&graph, "org.springframework:spring-web:jar:6.1.0");
        let beans = id_of(&graph, "org.springframework:spring-beans:jar:6.1.0");
        let observation = id_of(&graph, "io.micrometer:micrometer-observation:jar:1.12.0");
        let commons = id_of(&graph, "io.micrometer:micrometer-commons:jar:1.12.0");
        let logback = id_of(&graph, "ch.qos.logback:logback-classic:jar:1.4.11");
        let junit = id_of(&graph, "junit:junit:jar:4.13.2");

        assert_eq!(graph.dependencies(app), vec![web, logback, junit]);
        assert_eq!(graph.dependencies(web), vec![beans, observation]);
        assert_eq!(graph.dependencies(observation), vec![commons]);
        assert!(graph.dependencies(beans).is_empty());
    }

    #[test]
    fn test_dedent_to_root_level_attaches_to_first_line() {
        let input = "\
[INFO] --- dependency:3.6.0:tree @ app ---
[INFO] com.acme:app:jar:1.0
[INFO] +- com.acme:lib:jar:1.0:compile
[INFO] com.acme:other:jar:1.0
[INFO] \\- com.acme:leaf:jar:1.0:compile
[INFO]
";
        let graph = parse_tree("dedent", input).unwrap();

        let app = id_of(&graph, "com.acme:app:jar:1.0");
        let lib = id_of(&graph, "com.acme:lib:jar:1.0");
        let other = id_of(&graph, "com.acme:other:jar:1.0");
        let leaf = id_of(&graph, "com.acme:leaf:jar:1.0");

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.dependencies(app), vec![lib, other]);
        assert_eq!(graph.dependencies(other), vec![leaf]);
        assert!(graph.is_connected(app, leaf));
    }

    #[test]
    fn test_ids_follow_first_appearance() {
        let graph = parse_tree("ids", SIMPLE).unwrap();
        assert_eq!(id_of(&graph, "com.acme:app:jar:1.0"), 1);
        assert_eq!(id_of(&graph, "com.acme:lib:jar:1.0"), 2);
    }

    #[test]
    fn test_dedup_across_segments() {
        let input = "\
[INFO] --- dependency:3.6.0:tree @ core ---
[INFO] com.acme:core:jar:1.0
[INFO] \\- org.slf4j:slf4j-api:jar:2.0.9:compile
[INFO]
[INFO] --- dependency:3.6.0:tree @ web ---
[INFO] com.acme:web:jar:1.0
[INFO] +- com.acme:core:jar:1.0:compile
[INFO] |  \\- org.slf4j:slf4j-api:jar:2.0.9:compile
[INFO] \\- org.slf4j:slf4j-api:jar:2.0.9:compile
[INFO]
";
        let graph = parse_tree("modules", input).unwrap();

        assert_eq!(graph.node_count(), 3);
        let core = id_of(&graph, "com.acme:core:jar:1.0");
        let web = id_of(&graph, "com.acme:web:jar:1.0");
        let slf4j = id_of(&graph, "org.slf4j:slf4j-api:jar:2.0.9");

        // core -> slf4j is recorded once even though it appears in both segments.
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge(core, slf4j));
        assert!(graph.has_edge(web, core));
        assert!(graph.has_edge(web, slf4j));
    }

    #[test]
    fn test_no_segments_yields_empty_graph() {
        let graph = parse_tree("nothing", "[INFO] BUILD SUCCESS\n").unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.title(), "nothing");
    }
}
