//! Level assignment: linearizing a hierarchy into `(node, level)` rows.
//!
//! The rendering is built per weakly-connected component of the input, in
//! the order of each component's first node:
//!
//! 1. The component's *clean* subgraph is the cycle-free residual restricted
//!    to the component.
//! 2. Every node without an incoming clean edge is a root and opens its own
//!    block, in node order.
//! 3. A breadth-first walk from the root claims each reachable node once,
//!    at one level below the parent that reached it first. The block lists
//!    that spanning tree depth-first, so it reads as valid indented text.
//!
//! A node reachable from two roots shows up in both blocks. Finally every
//! broken edge is appended as a two-row block `parent` / `  child`, so the
//! relation is still visible in the text.
//!
//! Walks use explicit queues and stacks; deep hierarchies cannot overflow
//! the call stack.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use tracing::{debug, instrument};

use super::cycles::{CycleResolution, resolve_cycles};
use super::{Hierarchy, outgoing_in_order};
use crate::indent::Separator;

/// One row of a rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeLevel {
    pub node: String,
    pub level: usize,
}

impl NodeLevel {
    #[must_use]
    pub fn new(node: impl Into<String>, level: usize) -> Self {
        Self {
            node: node.into(),
            level,
        }
    }
}

impl Hierarchy {
    /// Resolve cycles and assign levels in one go.
    #[must_use]
    pub fn node_levels(&self, base_level: usize) -> Vec<NodeLevel> {
        let resolution = resolve_cycles(self);
        assign_levels(self, &resolution, base_level)
    }

    /// Render as indented text with levels starting at 0.
    #[must_use]
    pub fn to_indented_text(&self, separator: &Separator) -> Vec<String> {
        crate::render::to_indented_lines(&self.node_levels(0), separator)
    }
}

/// Linearize `original` using the residual graph and broken edges from
/// `resolution`. Roots are placed at `base_level`.
///
/// Every node of `original` appears at least once. Two concepts that list
/// each other as narrower have no root; the first of them in node order is
/// then used as one.
#[must_use]
#[instrument(skip(original, resolution), fields(nodes = original.node_count(), broken = resolution.broken_edges.len()))]
pub fn assign_levels(
    original: &Hierarchy,
    resolution: &CycleResolution,
    base_level: usize,
) -> Vec<NodeLevel> {
    let graph = original.graph();
    let residual = resolution.residual.graph();
    let broken: HashSet<(&str, &str)> = resolution
        .broken_edges
        .iter()
        .map(|(parent, child)| (parent.as_str(), child.as_str()))
        .collect();

    let mut rows = Vec::with_capacity(original.node_count() + 2 * broken.len());

    for component in weak_components(graph) {
        let members: HashSet<NodeIndex> = component.iter().copied().collect();
        let clean = CleanView {
            graph: residual,
            members: &members,
            broken: &broken,
        };

        let mut emitted: HashSet<NodeIndex> = HashSet::new();
        let roots: Vec<NodeIndex> = component
            .iter()
            .copied()
            .filter(|&node| clean.in_degree(node) == 0)
            .collect();
        for root in roots {
            emit_block(&clean, root, base_level, &mut rows, &mut emitted);
        }

        // Mutual pairs leave nodes without any root.
        for &node in &component {
            if !emitted.contains(&node) {
                debug!(node = %graph[node], "no root reaches node; rendering from it");
                emit_block(&clean, node, base_level, &mut rows, &mut emitted);
            }
        }
    }

    for (parent, child) in &resolution.broken_edges {
        rows.push(NodeLevel::new(parent.as_str(), base_level));
        rows.push(NodeLevel::new(child.as_str(), base_level.saturating_add(1)));
    }

    rows
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// The residual graph restricted to one component, minus broken edges.
struct CleanView<'a> {
    graph: &'a StableDiGraph<String, ()>,
    members: &'a HashSet<NodeIndex>,
    broken: &'a HashSet<(&'a str, &'a str)>,
}

impl CleanView<'_> {
    fn keeps(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.members.contains(&from)
            && self.members.contains(&to)
            && !self
                .broken
                .contains(&(self.graph[from].as_str(), self.graph[to].as_str()))
    }

    fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .filter(|&parent| self.keeps(parent, node))
            .count()
    }

    fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        outgoing_in_order(self.graph, node)
            .into_iter()
            .map(|(_, child)| child)
            .filter(|&child| self.keeps(node, child))
            .collect()
    }
}

/// Breadth-first spanning tree from `root`, written out depth-first.
fn emit_block(
    clean: &CleanView<'_>,
    root: NodeIndex,
    base_level: usize,
    rows: &mut Vec<NodeLevel>,
    emitted: &mut HashSet<NodeIndex>,
) {
    let mut tree: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
    let mut visited: HashSet<NodeIndex> = HashSet::from([root]);
    let mut queue: VecDeque<NodeIndex> = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        for child in clean.children(current) {
            if visited.insert(child) {
                tree.entry(current).or_default().push(child);
                queue.push_back(child);
            }
        }
    }

    let mut stack: Vec<(NodeIndex, usize)> = vec![(root, base_level)];
    while let Some((node, level)) = stack.pop() {
        rows.push(NodeLevel::new(clean.graph[node].as_str(), level));
        emitted.insert(node);
        if let Some(children) = tree.get(&node) {
            stack.extend(
                children
                    .iter()
                    .rev()
                    .map(|&child| (child, level.saturating_add(1))),
            );
        }
    }
}

/// Weakly-connected components, ordered by first node; members in node
/// order.
fn weak_components(graph: &StableDiGraph<String, ()>) -> Vec<Vec<NodeIndex>> {
    let mut seen: HashSet<NodeIndex> = HashSet::new();
    let mut components = Vec::new();

    for start in graph.node_indices() {
        if !seen.insert(start) {
            continue;
        }
        let mut component = vec![start];
        let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for next in graph.neighbors_undirected(node) {
                if seen.insert(next) {
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }

    components
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

    fn levels(rows: &[NodeLevel]) -> Vec<(&str, usize)> {
        rows.iter().map(|row| (row.node.as_str(), row.level)).collect()
    }

    #[test]
    fn chain_gets_increasing_levels() {
        let h = hierarchy(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(
            levels(&h.node_levels(0)),
            vec![("a", 0), ("b", 1), ("c", 2)]
        );
    }

    #[test]
    fn base_level_offsets_everything() {
        let h = hierarchy(&["a", "b"], &[("a", "b")]);
        assert_eq!(levels(&h.node_levels(2)), vec![("a", 2), ("b", 3)]);
    }

    #[test]
    fn shared_child_under_two_roots() {
        let h = hierarchy(
            &["ex:1", "ex:2", "ex:3", "ex:4"],
            &[("ex:1", "ex:2"), ("ex:2", "ex:3"), ("ex:4", "ex:3")],
        );
        assert_eq!(
            levels(&h.node_levels(0)),
            vec![
                ("ex:1", 0),
                ("ex:2", 1),
                ("ex:3", 2),
                ("ex:4", 0),
                ("ex:3", 1),
            ]
        );
    }

    #[test]
    fn block_is_depth_first_over_breadth_first_tree() {
        let h = hierarchy(
            &["r", "a", "b", "a1", "b1"],
            &[("r", "a"), ("r", "b"), ("a", "a1"), ("b", "b1")],
        );
        assert_eq!(
            levels(&h.node_levels(0)),
            vec![("r", 0), ("a", 1), ("a1", 2), ("b", 1), ("b1", 2)]
        );
    }

    #[test]
    fn isolated_nodes_keep_node_order() {
        let h = hierarchy(&["z", "a", "m"], &[]);
        assert_eq!(
            levels(&h.node_levels(0)),
            vec![("z", 0), ("a", 0), ("m", 0)]
        );
    }

    #[test]
    fn broken_edges_are_appended() {
        let h = hierarchy(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let resolution = resolve_cycles(&h);
        assert_eq!(resolution.broken_edges.len(), 1);

        let rows = assign_levels(&h, &resolution, 0);
        assert_eq!(rows.len(), h.node_count() + 2 * resolution.broken_edges.len());
        let (parent, child) = &resolution.broken_edges[0];
        let tail = &rows[rows.len() - 2..];
        assert_eq!(tail[0], NodeLevel::new(parent.as_str(), 0));
        assert_eq!(tail[1], NodeLevel::new(child.as_str(), 1));
    }

    #[test]
    fn mutual_pair_still_rendered() {
        let h = hierarchy(&["a", "b"], &[("a", "b"), ("b", "a")]);
        assert_eq!(levels(&h.node_levels(0)), vec![("a", 0), ("b", 1)]);
    }

    #[test]
    fn largest_base_level_does_not_overflow() {
        let h = hierarchy(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let rows = h.node_levels(usize::MAX);
        assert_eq!(rows.len(), h.node_count() + 2);
        assert!(rows.iter().all(|row| row.level == usize::MAX));
    }

    #[test]
    fn empty_hierarchy_renders_nothing() {
        assert!(Hierarchy::new().node_levels(0).is_empty());
    }
}
