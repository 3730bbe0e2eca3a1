//! k-core decomposition.
//!
//! The **k-core** is the maximal subgraph in which every node has degree at
//! least k. The **core number** of a node is the largest k whose k-core
//! still contains it; nodes with core number exactly k form the **k-shell**.
//!
//! Core numbers are computed with the Batagelj–Zaversnik bucket algorithm:
//! process nodes in increasing current degree, and each time a node is
//! fixed, lower the degree of its higher-degree neighbours by one.
//! O(n + m) time.
//!
//! # References
//!
//! Batagelj, Zaversnik (2003). "An O(m) Algorithm for Cores Decomposition of Networks."

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::error::{Error, Result};

/// Core number of every node, indexed by `NodeIndex::index()`.
///
/// Degree counts edges, so parallel edges each add one.
///
/// # Errors
///
/// [`Error::SelfLoop`] if the graph has a self-loop.
///
/// # Example
///
/// ```rust
/// use eigenmap::structure::core_number;
/// use petgraph::graph::UnGraph;
///
/// // Triangle with a pendant node.
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2), (2, 3)]);
/// assert_eq!(core_number(&graph).unwrap(), vec![2, 2, 2, 1]);
/// ```
pub fn core_number<N, E>(graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
    let n = graph.node_count();
    let mut degree = vec![0usize; n];
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];

    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if a == b {
            return Err(Error::SelfLoop { node: a });
        }
        degree[a] += 1;
        degree[b] += 1;
        neighbors[a].push(b);
        neighbors[b].push(a);
    }

    let max_degree = degree.iter().copied().max().unwrap_or(0);

    // bin[d] = first position in `order` of nodes with current degree d.
    let mut bin = vec![0usize; max_degree + 1];
    for &d in &degree {
        bin[d] += 1;
    }
    let mut start = 0;
    for slot in bin.iter_mut() {
        let count = *slot;
        *slot = start;
        start += count;
    }

    let mut pos = vec![0usize; n];
    let mut order = vec![0usize; n];
    {
        let mut next = bin.clone();
        for v in 0..n {
            pos[v] = next[degree[v]];
            order[pos[v]] = v;
            next[degree[v]] += 1;
        }
    }

    for i in 0..n {
        let v = order[i];
        for &u in &neighbors[v] {
            if degree[u] > degree[v] {
                let du = degree[u];
                let pu = pos[u];
                let pw = bin[du];
                let w = order[pw];
                if u != w {
                    order.swap(pu, pw);
                    pos[u] = pw;
                    pos[w] = pu;
                }
                bin[du] += 1;
                degree[u] -= 1;
            }
        }
    }

    Ok(degree)
}

/// The induced subgraph on nodes with core number at least `k`.
///
/// Node and edge payloads are cloned; surviving nodes keep their relative
/// order, but are re-indexed from 0.
pub fn k_core<N: Clone, E: Clone>(graph: &UnGraph<N, E>, k: usize) -> Result<UnGraph<N, E>> {
    let core = core_number(graph)?;
    Ok(graph.filter_map(
        |idx, weight| (core[idx.index()] >= k).then(|| weight.clone()),
        |_, weight| Some(weight.clone()),
    ))
}

/// Core numbers with shell/core queries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KCoreDecomposition {
    core_numbers: Vec<usize>,
}

impl KCoreDecomposition {
    /// Decompose `graph`.
    pub fn compute<N, E>(graph: &UnGraph<N, E>) -> Result<Self> {
        let core_numbers = core_number(graph)?;
        let decomposition = Self { core_numbers };
        debug!(
            n = decomposition.core_numbers.len(),
            max_core = decomposition.max_core(),
            "k-core decomposition"
        );
        Ok(decomposition)
    }

    /// Core number per node.
    pub fn core_numbers(&self) -> &[usize] {
        &self.core_numbers
    }

    /// Largest core number (0 for an empty or edgeless graph).
    pub fn max_core(&self) -> usize {
        self.core_numbers.iter().copied().max().unwrap_or(0)
    }

    /// Nodes of the k-core: core number ≥ k.
    pub fn core_nodes(&self, k: usize) -> Vec<usize> {
        self.nodes_where(|c| c >= k)
    }

    /// Nodes of the k-shell: core number == k.
    pub fn shell_nodes(&self, k: usize) -> Vec<usize> {
        self.nodes_where(|c| c == k)
    }

    /// Number of nodes in each shell `0..=max_core`.
    pub fn shell_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.max_core() + 1];
        for &c in &self.core_numbers {
            sizes[c] += 1;
        }
        sizes
    }

    fn nodes_where(&self, keep: impl Fn(usize) -> bool) -> Vec<usize> {
        self.core_numbers
            .iter()
            .enumerate()
            .filter(|&(_, &c)| keep(c))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn complete(n: u32) -> UnGraph<(), ()> {
        let edges = (0..n).flat_map(|a| ((a + 1)..n).map(move |b| (a, b)));
        UnGraph::from_edges(edges)
    }

    #[test]
    fn test_complete_graph() {
        assert_eq!(core_number(&complete(5)).unwrap(), vec![4; 5]);
    }

    #[test]
    fn test_path() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3)]);
        assert_eq!(core_number(&graph).unwrap(), vec![1; 4]);
    }

    #[test]
    fn test_isolated_node_is_zero() {
        let mut graph = complete(3);
        let _ = graph.add_node(());
        assert_eq!(core_number(&graph).unwrap(), vec![2, 2, 2, 0]);
    }

    #[test]
    fn test_clique_with_tail() {
        // K4 on 0..4, then a path 3-4-5.
        let mut edges: Vec<(u32, u32)> = (0..4u32)
            .flat_map(|a| ((a + 1)..4).map(move |b| (a, b)))
            .collect();
        edges.extend([(3, 4), (4, 5)]);
        let graph = UnGraph::<(), ()>::from_edges(edges);

        let kc = KCoreDecomposition::compute(&graph).unwrap();
        assert_eq!(kc.core_numbers(), &[3, 3, 3, 3, 1, 1]);
        assert_eq!(kc.max_core(), 3);
        assert_eq!(kc.core_nodes(2), vec![0, 1, 2, 3]);
        assert_eq!(kc.shell_nodes(1), vec![4, 5]);
        assert_eq!(kc.shell_sizes(), vec![0, 2, 0, 4]);
    }

    #[test]
    fn test_k_core_subgraph() {
        let names = ["a", "b", "c", "d"];
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2), (2, 3)])
            .map(|i, _| names[i.index()], |_, _| ());

        let core = k_core(&graph, 2).unwrap();
        assert_eq!(core.node_count(), 3);
        assert_eq!(core.edge_count(), 3);
        let names: Vec<_> = core.node_weights().copied().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_self_loop_rejected() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (2, 2)]);
        assert_eq!(core_number(&graph), Err(Error::SelfLoop { node: 2 }));
    }

    proptest! {
        #[test]
        fn core_number_bounded_by_degree_and_core_is_closed(
            edges in proptest::collection::vec((0u32..15, 0u32..15), 0..60),
        ) {
            let edges: Vec<(u32, u32)> = edges.into_iter().filter(|(a, b)| a != b).collect();
            let mut graph = UnGraph::<(), ()>::from_edges(edges);
            while graph.node_count() < 15 {
                let _ = graph.add_node(());
            }
            let core = core_number(&graph).unwrap();

            for (v, &c) in core.iter().enumerate() {
                let idx = petgraph::graph::NodeIndex::new(v);
                prop_assert!(c <= graph.edges(idx).count());

                // Inside its own core, a node keeps at least `c` edges.
                let inside = graph
                    .edges(idx)
                    .filter(|e| {
                        let other = if e.source() == idx { e.target() } else { e.source() };
                        core[other.index()] >= c
                    })
                    .count();
                prop_assert!(inside >= c);
            }
        }
    }
}
