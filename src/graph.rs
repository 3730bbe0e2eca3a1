//! Graph adapters: edge weights, canonical node order and dense matrices.
//!
//! Every per-node output in this crate is indexed by `NodeIndex::index()`.
//! For `petgraph::graph::UnGraph` that is node insertion order, and it is the
//! order shared by the adjacency matrix, the spectral embedding and the
//! returned labels.
//!
//! ```rust
//! use eigenmap::graph::AdjacencyMatrix;
//! use petgraph::graph::UnGraph;
//!
//! let graph = UnGraph::<(), f64>::from_edges([(0, 1, 2.0), (1, 2, 1.0)]);
//! let adj = AdjacencyMatrix::from_graph(&graph).unwrap();
//! assert_eq!(adj.get(0, 1), 2.0);
//! assert_eq!(adj.degrees(), vec![2.0, 3.0, 1.0]);
//! ```

use std::collections::BTreeSet;

use faer::{Mat, MatRef};
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};

/// Numeric weight carried by an edge.
///
/// `()` edges weigh `1.0`, so unweighted graphs work out of the box.
pub trait EdgeWeight {
    /// Weight of this edge as `f64`.
    fn weight(&self) -> f64;
}

impl EdgeWeight for () {
    #[inline]
    fn weight(&self) -> f64 {
        1.0
    }
}

macro_rules! impl_numeric_weight {
    ($($t:ty),* $(,)?) => {
        $(
            impl EdgeWeight for $t {
                #[inline]
                fn weight(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_numeric_weight!(f32, f64, u32, u64, usize, i32, i64);

/// Dense symmetric adjacency matrix in canonical node order.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix {
    inner: Mat<f64>,
}

impl AdjacencyMatrix {
    /// Build `A` from an undirected graph.
    ///
    /// Parallel edges are summed. Self-loops are rejected because the
    /// normalized Laplacian assumes `A[i][i] = 0`.
    ///
    /// # Errors
    ///
    /// - [`Error::SelfLoop`] if any edge connects a node to itself.
    /// - [`Error::InvalidParameter`] for negative or non-finite weights.
    pub fn from_graph<N, E: EdgeWeight>(graph: &UnGraph<N, E>) -> Result<Self> {
        let n = graph.node_count();
        let mut inner = Mat::<f64>::zeros(n, n);

        for edge in graph.edge_references() {
            let i = edge.source().index();
            let j = edge.target().index();
            if i == j {
                return Err(Error::SelfLoop { node: i });
            }
            let w = checked_weight(edge.weight())?;
            inner[(i, j)] += w;
            inner[(j, i)] += w;
        }

        Ok(Self { inner })
    }

    /// Number of nodes.
    pub fn n(&self) -> usize {
        self.inner.nrows()
    }

    /// Entry `A[i][j]`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    /// Weighted degrees: the row sums of `A`, i.e. the diagonal of `D`.
    pub fn degrees(&self) -> Vec<f64> {
        let n = self.n();
        (0..n)
            .map(|i| (0..n).map(|j| self.inner[(i, j)]).sum())
            .collect()
    }

    /// Borrow the underlying matrix.
    pub fn as_ref(&self) -> MatRef<'_, f64> {
        self.inner.as_ref()
    }

    /// Take the underlying matrix.
    pub fn into_inner(self) -> Mat<f64> {
        self.inner
    }
}

/// Build the adjacency matrix of `graph`. See [`AdjacencyMatrix::from_graph`].
pub fn adjacency_matrix<N, E: EdgeWeight>(graph: &UnGraph<N, E>) -> Result<AdjacencyMatrix> {
    AdjacencyMatrix::from_graph(graph)
}

/// Validate an edge weight: finite and non-negative.
pub(crate) fn checked_weight<E: EdgeWeight>(edge: &E) -> Result<f64> {
    let w = edge.weight();
    if !w.is_finite() || w < 0.0 {
        return Err(Error::invalid(
            "weight",
            format!("edge weights must be finite and non-negative, got {w}"),
        ));
    }
    Ok(w)
}

/// Simple-graph neighborhoods: parallel edges collapsed, self-loops dropped.
pub(crate) fn neighbor_sets<N, E>(graph: &UnGraph<N, E>) -> Vec<BTreeSet<usize>> {
    let mut adj = vec![BTreeSet::new(); graph.node_count()];
    for edge in graph.edge_references() {
        let i = edge.source().index();
        let j = edge.target().index();
        if i != j {
            adj[i].insert(j);
            adj[j].insert(i);
        }
    }
    adj
}
