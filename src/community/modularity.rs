//! Newman modularity of a node partition.

use std::collections::BTreeMap;

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};
use crate::graph::{checked_weight, EdgeWeight};

/// Modularity of `communities` on `graph`, resolution 1.
///
/// ```text
/// Q = Σ_c [ L_c / m − (d_c / 2m)² ]
/// ```
///
/// where `m` is the total edge weight, `L_c` the weight of edges inside `c`
/// and `d_c` the summed weighted degree of `c`. A self-loop counts once in
/// `m` and `L_c` and twice in the degree.
///
/// `communities` must partition the node set: every node index appears in
/// exactly one community.
///
/// # Example
///
/// ```rust
/// use eigenmap::community::modularity;
/// use petgraph::graph::UnGraph;
///
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]);
/// let q = modularity(&graph, &[vec![0, 1, 2], vec![3, 4, 5]]).unwrap();
/// assert!((q - 0.5).abs() < 1e-12);
/// ```
pub fn modularity<N, E: EdgeWeight>(
    graph: &UnGraph<N, E>,
    communities: &[Vec<usize>],
) -> Result<f64> {
    let labels = labels_from_communities(graph.node_count(), communities)?;
    modularity_labels(graph, &labels)
}

/// Modularity of a partition given as one label per node.
pub fn modularity_labels<N, E: EdgeWeight>(
    graph: &UnGraph<N, E>,
    labels: &[usize],
) -> Result<f64> {
    let n = graph.node_count();
    if labels.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: labels.len(),
        });
    }

    let mut m = 0.0;
    // Ordered by label so the sum is reproducible bit for bit.
    let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
    let mut community_degree: BTreeMap<usize, f64> = BTreeMap::new();

    for edge in graph.edge_references() {
        let w = checked_weight(edge.weight())?;
        let ci = labels[edge.source().index()];
        let cj = labels[edge.target().index()];
        m += w;
        *community_degree.entry(ci).or_insert(0.0) += w;
        *community_degree.entry(cj).or_insert(0.0) += w;
        if ci == cj {
            *internal.entry(ci).or_insert(0.0) += w;
        }
    }

    if m == 0.0 {
        return Ok(0.0);
    }

    let q: f64 = community_degree
        .iter()
        .map(|(c, &d_c)| {
            let l_c = internal.get(c).copied().unwrap_or(0.0);
            l_c / m - (d_c / (2.0 * m)).powi(2)
        })
        .sum();

    Ok(q)
}

/// Convert a list of communities into per-node labels, checking it is a partition.
pub(crate) fn labels_from_communities(
    n: usize,
    communities: &[Vec<usize>],
) -> Result<Vec<usize>> {
    let mut labels = vec![usize::MAX; n];
    for (c, members) in communities.iter().enumerate() {
        for &node in members {
            if node >= n {
                return Err(Error::invalid(
                    "communities",
                    format!("node {node} out of range for {n} nodes"),
                ));
            }
            if labels[node] != usize::MAX {
                return Err(Error::invalid(
                    "communities",
                    format!("node {node} appears in more than one community"),
                ));
            }
            labels[node] = c;
        }
    }
    if let Some(missing) = labels.iter().position(|&l| l == usize::MAX) {
        return Err(Error::invalid(
            "communities",
            format!("node {missing} is not in any community"),
        ));
    }
    Ok(labels)
}
