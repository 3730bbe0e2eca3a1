//! Maximal clique enumeration.
//!
//! Bron–Kerbosch with Tomita pivoting: at each step, pick the pivot `u` from
//! `P ∪ X` with the most neighbours in `P`, and only branch on `P \ N(u)`.
//! Worst case O(3^{n/3}), which is the number of maximal cliques a graph
//! can have.
//!
//! # References
//!
//! Tomita, Tanaka, Takahashi (2006). "The worst-case time complexity for
//! generating all maximal cliques and computational experiments."

use std::collections::BTreeSet;

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::graph::neighbor_sets;

/// All maximal cliques of `graph`.
///
/// Each clique is sorted; the list is sorted lexicographically. Self-loops
/// and parallel edges don't affect the result, and an isolated node is a
/// clique of its own.
///
/// ```rust
/// use eigenmap::structure::find_cliques;
/// use petgraph::graph::UnGraph;
///
/// // Two triangles sharing the edge 1-2.
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
/// assert_eq!(find_cliques(&graph), vec![vec![0, 1, 2], vec![1, 2, 3]]);
/// ```
pub fn find_cliques<N, E>(graph: &UnGraph<N, E>) -> Vec<Vec<usize>> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let adj = neighbor_sets(graph);
    let mut cliques = Vec::new();
    let mut current = Vec::new();
    expand(
        &adj,
        &mut current,
        (0..n).collect(),
        BTreeSet::new(),
        &mut cliques,
    );

    for clique in &mut cliques {
        clique.sort_unstable();
    }
    cliques.sort();
    cliques
}

fn expand(
    adj: &[BTreeSet<usize>],
    current: &mut Vec<usize>,
    mut candidates: BTreeSet<usize>,
    mut excluded: BTreeSet<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() {
            out.push(current.clone());
        }
        return;
    }

    let mut pivot = None;
    let mut pivot_degree = 0;
    for &u in candidates.union(&excluded) {
        let d = adj[u].intersection(&candidates).count();
        if pivot.is_none() || d > pivot_degree {
            pivot = Some(u);
            pivot_degree = d;
        }
    }
    let branch: Vec<usize> = match pivot {
        Some(u) => candidates.difference(&adj[u]).copied().collect(),
        None => candidates.iter().copied().collect(),
    };

    for v in branch {
        current.push(v);
        expand(
            adj,
            current,
            candidates.intersection(&adj[v]).copied().collect(),
            excluded.intersection(&adj[v]).copied().collect(),
            out,
        );
        let _ = current.pop();
        let _ = candidates.remove(&v);
        let _ = excluded.insert(v);
    }
}

/// The maximum-size cliques of a graph with their node and edge masks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LargestCliques {
    cliques: Vec<Vec<usize>>,
    node_masks: Vec<Vec<bool>>,
    edge_masks: Vec<Vec<bool>>,
}

impl LargestCliques {
    /// The cliques, each sorted.
    pub fn cliques(&self) -> &[Vec<usize>] {
        &self.cliques
    }

    /// Size shared by every clique (0 for an empty graph).
    pub fn clique_size(&self) -> usize {
        self.cliques.first().map_or(0, Vec::len)
    }

    /// Per-node membership of clique `i`, indexed by `NodeIndex::index()`.
    pub fn node_mask(&self, i: usize) -> Option<&[bool]> {
        self.node_masks.get(i).map(Vec::as_slice)
    }

    /// Per-edge membership of clique `i`, indexed by `EdgeIndex::index()`.
    ///
    /// An edge belongs to the clique when both endpoints do.
    pub fn edge_mask(&self, i: usize) -> Option<&[bool]> {
        self.edge_masks.get(i).map(Vec::as_slice)
    }

    /// Number of maximum cliques.
    pub fn len(&self) -> usize {
        self.cliques.len()
    }

    /// Whether there are none (only for an empty graph).
    pub fn is_empty(&self) -> bool {
        self.cliques.is_empty()
    }
}

/// Every maximal clique of maximum size, with membership masks.
pub fn largest_cliques<N, E>(graph: &UnGraph<N, E>) -> LargestCliques {
    let all = find_cliques(graph);
    let size = all.iter().map(Vec::len).max().unwrap_or(0);
    let cliques: Vec<Vec<usize>> = all.into_iter().filter(|c| c.len() == size).collect();

    let n = graph.node_count();
    let node_masks: Vec<Vec<bool>> = cliques
        .iter()
        .map(|clique| {
            let mut mask = vec![false; n];
            for &v in clique {
                mask[v] = true;
            }
            mask
        })
        .collect();

    let edge_masks = node_masks
        .iter()
        .map(|mask| {
            graph
                .edge_references()
                .map(|e| mask[e.source().index()] && mask[e.target().index()])
                .collect()
        })
        .collect();

    debug!(count = cliques.len(), size, "largest cliques");
    LargestCliques {
        cliques,
        node_masks,
        edge_masks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let graph = UnGraph::<(), ()>::new_undirected();
        assert!(find_cliques(&graph).is_empty());
        let largest = largest_cliques(&graph);
        assert!(largest.is_empty());
        assert_eq!(largest.clique_size(), 0);
    }

    #[test]
    fn test_isolated_nodes_are_singletons() {
        let mut graph = UnGraph::<(), ()>::from_edges([(0, 1)]);
        let _ = graph.add_node(());
        assert_eq!(find_cliques(&graph), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_complete_graph_single_clique() {
        let edges = (0..5u32).flat_map(|a| ((a + 1)..5).map(move |b| (a, b)));
        let graph = UnGraph::<(), ()>::from_edges(edges);
        assert_eq!(find_cliques(&graph), vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn test_ignores_self_loops_and_multi_edges() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(find_cliques(&graph), vec![vec![0, 1], vec![1, 2]]);
    }

    #[test]
    fn test_cycle_of_five() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let cliques = find_cliques(&graph);
        assert_eq!(cliques.len(), 5);
        assert!(cliques.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn test_largest_cliques_masks() {
        // K4 on {0,1,2,3}, triangle {3,4,5}, edge 5-6.
        let graph = UnGraph::<(), ()>::from_edges([
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 2),
            (1, 3),
            (2, 3),
            (3, 4),
            (4, 5),
            (3, 5),
            (5, 6),
        ]);
        let largest = largest_cliques(&graph);

        assert_eq!(largest.len(), 1);
        assert_eq!(largest.clique_size(), 4);
        assert_eq!(largest.cliques(), &[vec![0, 1, 2, 3]]);
        assert_eq!(
            largest.node_mask(0).unwrap(),
            &[true, true, true, true, false, false, false]
        );
        assert_eq!(
            largest.edge_mask(0).unwrap(),
            &[true, true, true, true, true, true, false, false, false, false]
        );
        assert!(largest.node_mask(1).is_none());
    }

    #[test]
    fn test_every_clique_is_complete_and_maximal() {
        let graph = UnGraph::<(), ()>::from_edges([
            (0, 1),
            (1, 2),
            (2, 0),
            (2, 3),
            (3, 4),
            (4, 2),
            (4, 5),
            (5, 6),
            (6, 4),
            (6, 0),
        ]);
        let adj = neighbor_sets(&graph);
        for clique in find_cliques(&graph) {
            for (i, &a) in clique.iter().enumerate() {
                for &b in &clique[i + 1..] {
                    assert!(adj[a].contains(&b), "{clique:?} not complete");
                }
            }
            let extendable = (0..graph.node_count())
                .filter(|v| !clique.contains(v))
                .any(|v| clique.iter().all(|c| adj[v].contains(c)));
            assert!(!extendable, "{clique:?} not maximal");
        }
    }
}
