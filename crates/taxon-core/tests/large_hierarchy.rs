//! Resolution on vocabulary-sized graphs where most concepts have two
//! parents.

use std::time::{Duration, Instant};

use taxon_core::{Hierarchy, assign_levels, cycle_basis, resolve_cycles};

/// Small xorshift generator so the graph is the same on every run.
struct XorShift(u64);

impl XorShift {
    fn next_below(&mut self, bound: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        usize::try_from(self.0 % bound as u64).expect("bound fits in usize")
    }
}

/// Every concept after the first two gets two distinct earlier parents.
fn two_parent_hierarchy(size: usize, seed: u64) -> Hierarchy {
    let mut rng = XorShift(seed);
    let mut h = Hierarchy::new();
    for i in 0..size {
        h.add_node(&format!("c{i}"));
    }
    h.add_edge("c0", "c1");
    for i in 2..size {
        let first = rng.next_below(i);
        let mut second = rng.next_below(i);
        if second == first {
            second = (first + 1) % i;
        }
        h.add_edge(&format!("c{first}"), &format!("c{i}"));
        h.add_edge(&format!("c{second}"), &format!("c{i}"));
    }
    h
}

#[test]
fn two_thousand_concepts_with_two_parents() {
    let h = two_parent_hierarchy(2_000, 0x5EED_CAFE);
    assert_eq!(h.edge_count(), 1 + 2 * 1_998);

    let started = Instant::now();
    let resolution = resolve_cycles(&h);
    let elapsed = started.elapsed();

    // The residual is a spanning forest of the single component.
    assert_eq!(resolution.residual.edge_count(), h.node_count() - 1);
    assert_eq!(
        resolution.broken_edges.len(),
        h.edge_count() - (h.node_count() - 1)
    );
    assert!(cycle_basis(&resolution.residual).is_empty());
    assert!(
        elapsed < Duration::from_secs(20),
        "resolving {} edges took {elapsed:?}",
        h.edge_count()
    );

    let rows = assign_levels(&h, &resolution, 0);
    assert!(rows.len() >= h.node_count() + 2 * resolution.broken_edges.len());
}
