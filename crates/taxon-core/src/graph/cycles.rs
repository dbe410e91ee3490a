//! Deterministic cycle breaking for concept hierarchies.
//!
//! # What counts as a cycle
//!
//! Indented text can only express a forest, so anything that is not a
//! forest in the *undirected* sense has to be cut before rendering: true
//! directed cycles as well as "diamonds" where two paths from one concept
//! meet again further down. Detection therefore works on the undirected view
//! of the graph and uses a cycle basis (Paton's algorithm).
//!
//! The basis reports self-loops and cycles of three or more nodes. Two
//! concepts that list each other as narrower (`a → b`, `b → a`) collapse to
//! a single undirected edge and are **not** reported; such pairs survive
//! resolution unchanged.
//!
//! # Edge selection
//!
//! For the first cycle of the current basis, every directed edge whose two
//! endpoints both belong to the cycle is a candidate. The edge `(u, v)` with
//! the largest `out_degree(v) - out_degree(u)` in the current graph is cut:
//! it leads into a concept that has comparatively many narrower concepts of
//! its own, which keeps the better connected parent chains intact. Ties go
//! to the candidate inserted first, so the same input always loses the same
//! edges.
//!
//! Each round removes exactly one edge, so the loop ends after at most
//! `edge_count` rounds. A round only needs the head of the basis, so the
//! walk stops at the first cycle it closes.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use tracing::{debug, instrument, trace, warn};

use super::Hierarchy;

/// Result of breaking all cycles in a hierarchy.
#[derive(Debug, Clone)]
pub struct CycleResolution {
    /// The input minus every broken edge. Its undirected view has an empty
    /// cycle basis.
    pub residual: Hierarchy,
    /// Removed `(parent, child)` edges in removal order, oriented as in the
    /// input.
    pub broken_edges: Vec<(String, String)>,
}

/// Cycle basis of the undirected view of `hierarchy`, as label lists.
///
/// Self-loops are one-element cycles. Mutual `a ⇄ b` pairs are not cycles
/// here.
#[must_use]
pub fn cycle_basis(hierarchy: &Hierarchy) -> Vec<Vec<String>> {
    let graph = hierarchy.graph();
    cycle_basis_indices(graph, BasisScope::Full)
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|idx| graph[idx].clone()).collect())
        .collect()
}

/// Remove edges from a copy of `hierarchy` until its undirected view has no
/// cycles left.
///
/// Total: works for any graph, including empty ones, disconnected ones, and
/// ones with self-loops.
#[must_use]
#[instrument(skip(hierarchy), fields(nodes = hierarchy.node_count(), edges = hierarchy.edge_count()))]
pub fn resolve_cycles(hierarchy: &Hierarchy) -> CycleResolution {
    let mut residual = hierarchy.clone();
    let mut broken_edges = Vec::new();

    loop {
        let Some(cycle) = cycle_basis_indices(residual.graph(), BasisScope::FirstCycle)
            .into_iter()
            .next()
        else {
            break;
        };
        trace!(cycle_len = cycle.len(), "cycle found");

        let members: HashSet<NodeIndex> = cycle.into_iter().collect();
        let Some(edge) = select_edge_to_break(residual.graph(), &members) else {
            // Every basis cycle is made of residual edges, so a candidate
            // always exists.
            warn!("cycle without candidate edge; stopping resolution");
            break;
        };
        let Some((from, to)) = residual.remove_edge(edge) else {
            break;
        };

        let (parent, child) = if hierarchy.contains_edge(&from, &to) {
            (from, to)
        } else {
            (to, from)
        };
        debug!(%parent, %child, "breaking cycle edge");
        broken_edges.push((parent, child));
    }

    CycleResolution {
        residual,
        broken_edges,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Pick the candidate edge with the largest out-degree gain.
///
/// Only edges leaving a cycle member are looked at. Candidates are visited
/// in edge index order, which is insertion order.
#[allow(clippy::cast_possible_wrap)]
fn select_edge_to_break(
    graph: &StableDiGraph<String, ()>,
    members: &HashSet<NodeIndex>,
) -> Option<EdgeIndex> {
    let out_degree = |node: NodeIndex| graph.edges_directed(node, Direction::Outgoing).count() as i64;

    let mut candidates: Vec<(EdgeIndex, NodeIndex, NodeIndex)> = members
        .iter()
        .flat_map(|&u| {
            graph
                .edges_directed(u, Direction::Outgoing)
                .filter(|edge| members.contains(&edge.target()))
                .map(move |edge| (edge.id(), u, edge.target()))
        })
        .collect();
    candidates.sort_unstable_by_key(|(edge, _, _)| *edge);

    let mut best: Option<(EdgeIndex, i64)> = None;
    for (edge, u, v) in candidates {
        let gain = out_degree(v) - out_degree(u);
        // Strictly greater: the earliest inserted edge wins ties.
        if best.is_none_or(|(_, best_gain)| gain > best_gain) {
            best = Some((edge, gain));
        }
    }
    best.map(|(edge, _)| edge)
}

/// Undirected, de-duplicated adjacency in edge insertion order.
fn undirected_adjacency(
    graph: &StableDiGraph<String, ()>,
) -> HashMap<NodeIndex, Vec<NodeIndex>> {
    let mut adjacency: HashMap<NodeIndex, Vec<NodeIndex>> =
        graph.node_indices().map(|idx| (idx, Vec::new())).collect();
    let mut linked: HashSet<(NodeIndex, NodeIndex)> = HashSet::with_capacity(graph.edge_count());

    for edge in graph.edge_references() {
        let (u, v) = (edge.source(), edge.target());
        let key = if u <= v { (u, v) } else { (v, u) };
        if !linked.insert(key) {
            continue;
        }
        adjacency.entry(u).or_default().push(v);
        if u != v {
            adjacency.entry(v).or_default().push(u);
        }
    }
    adjacency
}

/// How much of the basis to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BasisScope {
    Full,
    FirstCycle,
}

/// Paton's cycle basis over the undirected view, roots taken in node order.
///
/// With [`BasisScope::FirstCycle`] the walk stops at the first cycle found,
/// which is the head of the full basis.
fn cycle_basis_indices(
    graph: &StableDiGraph<String, ()>,
    scope: BasisScope,
) -> Vec<Vec<NodeIndex>> {
    let adjacency = undirected_adjacency(graph);
    let mut covered: HashSet<NodeIndex> = HashSet::new();
    let mut cycles = Vec::new();

    for root in graph.node_indices() {
        if covered.contains(&root) {
            continue;
        }

        let mut stack = vec![root];
        let mut pred: HashMap<NodeIndex, NodeIndex> = HashMap::from([(root, root)]);
        let mut used: HashMap<NodeIndex, HashSet<NodeIndex>> =
            HashMap::from([(root, HashSet::new())]);

        while let Some(z) = stack.pop() {
            let Some(neighbors) = adjacency.get(&z) else {
                continue;
            };
            for &nbr in neighbors {
                if !used.contains_key(&nbr) {
                    pred.insert(nbr, z);
                    stack.push(nbr);
                    used.insert(nbr, HashSet::from([z]));
                } else if nbr == z {
                    cycles.push(vec![z]);
                } else if !used.get(&z).is_some_and(|seen| seen.contains(&nbr)) {
                    let closing = &used[&nbr];
                    let mut cycle = vec![nbr, z];
                    let mut p = pred[&z];
                    while !closing.contains(&p) {
                        cycle.push(p);
                        p = pred[&p];
                    }
                    cycle.push(p);
                    cycles.push(cycle);
                    if let Some(seen) = used.get_mut(&nbr) {
                        seen.insert(z);
                    }
                }
                if scope == BasisScope::FirstCycle && !cycles.is_empty() {
                    return cycles;
                }
            }
        }

        covered.extend(pred.into_keys());
    }

    cycles
}
