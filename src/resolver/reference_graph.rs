//! Reference graph of increment declarations.
//!
//! Nodes are increments, scans and templates; edges point from an increment to
//! everything it references. Only increment nodes have outgoing edges, so any
//! cycle runs through increments alone. The graph is built from declarations
//! only and never touches the file system, which makes it usable for
//! rendering a configuration that does not resolve.

use crate::core::ConfigError;
use crate::declaration::{IncrementDeclaration, IncrementReference};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Kind of a node in the reference graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    /// An increment.
    Increment,
    /// A template scan.
    Scan,
    /// A template id.
    Template,
}

/// A node of the reference graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceNode {
    /// Node kind.
    pub kind: ReferenceKind,
    /// Increment name, scan name or template id.
    pub name: String,
}

impl ReferenceNode {
    /// An increment node.
    pub fn increment(name: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Increment,
            name: name.into(),
        }
    }

    /// Display name with a kind prefix, e.g. `scan:entities`.
    pub fn display_name(&self) -> String {
        let kind = match self.kind {
            ReferenceKind::Increment => "increment",
            ReferenceKind::Scan => "scan",
            ReferenceKind::Template => "template",
        };
        format!("{kind}:{}", self.name)
    }
}

impl From<IncrementReference<'_>> for ReferenceNode {
    fn from(reference: IncrementReference<'_>) -> Self {
        let (kind, name) = match reference {
            IncrementReference::Template(name) => (ReferenceKind::Template, name),
            IncrementReference::Scan(name) => (ReferenceKind::Scan, name),
            IncrementReference::Increment(name) => (ReferenceKind::Increment, name),
        };
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ReferenceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet.
    White,
    /// On the current DFS path.
    Gray,
    /// Fully explored.
    Black,
}

/// Directed graph of increment references.
pub struct IncrementGraph {
    graph: DiGraph<ReferenceNode, ()>,
    node_map: HashMap<ReferenceNode, NodeIndex>,
}

impl IncrementGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the graph of all increment declarations.
    ///
    /// Every increment becomes a node even when nothing references it.
    pub fn from_declarations(declarations: &[IncrementDeclaration]) -> Self {
        let mut graph = Self::new();
        for declaration in declarations {
            let from = ReferenceNode::increment(&declaration.name);
            graph.ensure_node(from.clone());
            for reference in declaration.references() {
                graph.add_reference(from.clone(), reference.into());
            }
        }
        graph
    }

    fn ensure_node(&mut self, node: ReferenceNode) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node) {
            index
        } else {
            let index = self.graph.add_node(node.clone());
            self.node_map.insert(node, index);
            index
        }
    }

    /// Record that `from` references `to`.
    pub fn add_reference(&mut self, from: ReferenceNode, to: ReferenceNode) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Whether the graph has a node for the increment `name`.
    pub fn contains_increment(&self, name: &str) -> bool {
        self.node_map.contains_key(&ReferenceNode::increment(name))
    }

    /// Detect reference cycles using DFS with colors.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IncrementReferenceCycle`] with the full chain, e.g.
    /// `a → b → a`.
    pub fn detect_cycles(&self) -> Result<(), ConfigError> {
        let mut colors: HashMap<NodeIndex, Color> =
            self.graph.node_indices().map(|node| (node, Color::White)).collect();
        let mut path: Vec<NodeIndex> = Vec::new();

        for node in self.graph.node_indices() {
            if matches!(colors.get(&node), Some(Color::White))
                && let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path)
            {
                let chain =
                    cycle.iter().map(|idx| self.graph[*idx].name.as_str()).collect::<Vec<_>>().join(" → ");
                return Err(ConfigError::IncrementReferenceCycle {
                    chain,
                });
            }
        }

        Ok(())
    }

    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<NodeIndex>> {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.direct_references(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    let start = path.iter().position(|n| *n == neighbor).unwrap_or_default();
                    let mut cycle = path[start..].to_vec();
                    cycle.push(neighbor);
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Direct references in declaration order.
    fn direct_references(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph iterates the most recently added edge first
        let mut neighbors: Vec<_> = self.graph.neighbors(node).collect();
        neighbors.reverse();
        neighbors
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of references.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Render the references below `root` as a tree.
    ///
    /// Increments reached a second time on the same branch are marked as a
    /// circular reference instead of being expanded again.
    pub fn to_tree_string(&self, root: &ReferenceNode) -> String {
        let mut result = String::new();
        let Some(&index) = self.node_map.get(root) else {
            return result;
        };
        let mut visiting = HashSet::new();
        self.build_tree_string(index, &mut result, "", true, &mut visiting);
        result
    }

    fn build_tree_string(
        &self,
        node: NodeIndex,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        visiting: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{prefix}{connector}{}\n", self.graph[node].display_name()));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        if !visiting.insert(node) {
            result.push_str(&format!("{child_prefix}└── (circular reference)\n"));
            return;
        }

        let references = self.direct_references(node);
        for (i, reference) in references.iter().enumerate() {
            let is_last_child = i == references.len() - 1;
            self.build_tree_string(*reference, result, &child_prefix, is_last_child, visiting);
        }
        visiting.remove(&node);
    }
}

impl Default for IncrementGraph {
    fn default() -> Self {
        Self::new()
    }
}
