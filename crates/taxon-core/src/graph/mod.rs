//! Concept hierarchy graph.
//!
//! # Overview
//!
//! A [`Hierarchy`] is a directed graph whose nodes are concept labels and
//! whose edges point from a broader concept to a narrower one. It is the
//! meeting point of both exchange formats:
//!
//! ```text
//! indented text ──build::from_indented_text──┐
//!                                            ├──> Hierarchy
//! relation mapping ──build::from_mapping─────┘        │
//!                                                     ↓ cycles::resolve_cycles
//!                                     residual graph + broken edges
//!                                                     ↓ levels::assign_levels
//!                                           Vec<NodeLevel> ──> indented text
//! ```
//!
//! ## Ordering
//!
//! Nodes keep first-seen order and edges keep insertion order. Both orders
//! are observable: they drive root selection, breadth-first child order, and
//! the tie-break when the cycle resolver has several equally good edges to
//! cut. The backing store is a [`StableDiGraph`] so that removing an edge
//! never renumbers the remaining ones.
//!
//! ## Typical Usage
//!
//! ```rust
//! use taxon_core::{Hierarchy, Separator};
//!
//! let text = "animal\n mammal\n  dog\n bird\n";
//! let hierarchy = Hierarchy::from_indented_text(text, &Separator::space())?;
//! assert_eq!(hierarchy.node_count(), 4);
//!
//! let dots = Separator::indent("..")?;
//! assert_eq!(
//!     hierarchy.to_indented_text(&dots),
//!     vec!["animal", "..mammal", "....dog", "..bird"],
//! );
//! # Ok::<(), taxon_core::HierarchyError>(())
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod build;
pub mod cycles;
pub mod levels;

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;

pub use build::ParsedText;
pub use cycles::{CycleResolution, cycle_basis, resolve_cycles};
pub use levels::{NodeLevel, assign_levels};

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

/// A directed concept graph: nodes are labels, an edge `A → B` means
/// "A has narrower concept B".
///
/// Labels are unique. The graph may contain cycles, nodes with several
/// parents, and isolated nodes.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    graph: StableDiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `label` as a node unless it already exists. Returns its index.
    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(label) {
            return idx;
        }
        let idx = self.graph.add_node(label.to_string());
        self.node_map.insert(label.to_string(), idx);
        idx
    }

    /// Add the edge `parent → child`, creating missing endpoints.
    ///
    /// Returns `false` if the edge was already present.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> bool {
        let from = self.add_node(parent);
        let to = self.add_node(child);
        if self.graph.contains_edge(from, to) {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    /// Return the number of nodes (concepts).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges (narrower relations).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the hierarchy has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Returns `true` if `label` is a node.
    #[must_use]
    pub fn contains_node(&self, label: &str) -> bool {
        self.node_map.contains_key(label)
    }

    /// Returns `true` if the edge `parent → child` exists.
    #[must_use]
    pub fn contains_edge(&self, parent: &str, child: &str) -> bool {
        match (self.node_map.get(parent), self.node_map.get(child)) {
            (Some(&from), Some(&to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// Node labels in first-seen order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Edges as `(parent, child)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
            )
        })
    }

    /// Direct children of `label` in edge insertion order.
    ///
    /// Unknown labels have no children.
    #[must_use]
    pub fn children(&self, label: &str) -> Vec<&str> {
        self.node_map.get(label).map_or_else(Vec::new, |&idx| {
            outgoing_in_order(&self.graph, idx)
                .into_iter()
                .map(|(_, child)| self.graph[child].as_str())
                .collect()
        })
    }

    /// Direct parents of `label`, in node order.
    #[must_use]
    pub fn parents(&self, label: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(label) else {
            return Vec::new();
        };
        let mut parents: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        parents.sort_unstable();
        parents.dedup();
        parents
            .into_iter()
            .map(|parent| self.graph[parent].as_str())
            .collect()
    }

    /// BLAKE3 hash over the node list and the sorted edge set.
    ///
    /// Two hierarchies with the same nodes in the same order and the same
    /// edges hash equal regardless of edge insertion order.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut edges: Vec<(&str, &str)> = self.edges().collect();
        edges.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for node in self.nodes() {
            hasher.update(node.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
        for (parent, child) in edges {
            hasher.update(parent.as_bytes());
            hasher.update(b"\x00");
            hasher.update(child.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }

    pub(crate) const fn graph(&self) -> &StableDiGraph<String, ()> {
        &self.graph
    }

    pub(crate) fn remove_edge(&mut self, edge: EdgeIndex) -> Option<(String, String)> {
        let (from, to) = self.graph.edge_endpoints(edge)?;
        self.graph.remove_edge(edge)?;
        Some((self.graph[from].clone(), self.graph[to].clone()))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Outgoing edges of `node` sorted by edge index, i.e. insertion order.
///
/// petgraph walks adjacency lists newest-first, so the order has to be
/// restored explicitly.
pub(crate) fn outgoing_in_order(
    graph: &StableDiGraph<String, ()>,
    node: NodeIndex,
) -> Vec<(EdgeIndex, NodeIndex)> {
    let mut out: Vec<(EdgeIndex, NodeIndex)> = graph
        .edges_directed(node, Direction::Outgoing)
        .map(|edge| (edge.id(), edge.target()))
        .collect();
    out.sort_unstable_by_key(|(edge, _)| *edge);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy(nodes: &[&str], edges: &[(&str, &str)]) -> Hierarchy {
        let mut h = Hierarchy::new();
        for node in nodes {
            h.add_node(node);
        }
        for (parent, child) in edges {
            h.add_edge(parent, child);
        }
        h
    }

    #[test]
    fn empty_hierarchy() {
        let h = Hierarchy::new();
        assert!(h.is_empty());
        assert_eq!(h.edge_count(), 0);
        assert!(h.content_hash().starts_with("blake3:"));
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut h = Hierarchy::new();
        let a = h.add_node("a");
        assert_eq!(h.add_node("a"), a);
        assert_eq!(h.node_count(), 1);
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut h = Hierarchy::new();
        assert!(h.add_edge("a", "b"));
        assert!(!h.add_edge("a", "b"));
        assert_eq!(h.edge_count(), 1);
    }

    #[test]
    fn add_edge_creates_missing_endpoints() {
        let mut h = Hierarchy::new();
        h.add_edge("p", "c");
        assert_eq!(h.nodes().collect::<Vec<_>>(), vec!["p", "c"]);
        assert!(h.contains_edge("p", "c"));
        assert!(!h.contains_edge("c", "p"));
        assert!(!h.contains_edge("p", "missing"));
    }

    #[test]
    fn children_follow_insertion_order() {
        let h = hierarchy(&["root", "z", "a", "m"], &[("root", "z"), ("root", "a"), ("root", "m")]);
        assert_eq!(h.children("root"), vec!["z", "a", "m"]);
        assert!(h.children("nope").is_empty());
    }

    #[test]
    fn parents_in_node_order() {
        let h = hierarchy(&["b", "a", "x"], &[("a", "x"), ("b", "x")]);
        assert_eq!(h.parents("x"), vec!["b", "a"]);
        assert!(h.parents("a").is_empty());
    }

    #[test]
    fn content_hash_ignores_edge_insertion_order() {
        let h1 = hierarchy(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
        let h2 = hierarchy(&["a", "b", "c"], &[("a", "c"), ("a", "b")]);
        let h3 = hierarchy(&["a", "b", "c"], &[("a", "b")]);
        assert_eq!(h1.content_hash(), h2.content_hash());
        assert_ne!(h1.content_hash(), h3.content_hash());
    }

    #[test]
    fn removing_an_edge_keeps_order_of_the_rest() {
        let mut h = hierarchy(&["a", "b", "c", "d"], &[("a", "b"), ("a", "c"), ("a", "d")]);
        let first = h
            .graph()
            .edge_indices()
            .next()
            .expect("graph has edges");
        assert_eq!(h.remove_edge(first), Some(("a".to_string(), "b".to_string())));
        assert_eq!(h.edges().collect::<Vec<_>>(), vec![("a", "c"), ("a", "d")]);
    }
}
