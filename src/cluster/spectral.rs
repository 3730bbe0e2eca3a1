//! Spectral clustering of graphs via Laplacian eigenmaps.
//!
//! Spectral clustering works by:
//! 1. Build the adjacency matrix A of the graph
//! 2. Compute the normalized Laplacian
//! 3. Embed each node with the smallest non-trivial eigenvectors
//! 4. Run k-means on the embedded nodes
//!
//! # Algorithm
//!
//! ```text
//! 1. A ∈ ℝ^{n×n}, A_ij = A_ji = edge weight, A_ii = 0
//! 2. d_i = Σ_j A_ij
//! 3. L_n = D^{-1/2} (D - A) D^{-1/2}      (elementwise 1/√d_i)
//! 4. L_n = U Λ Uᵀ, λ_0 ≤ λ_1 ≤ … ≤ λ_{n-1}
//! 5. Embedding = columns 1..=c of U      (column 0 is trivial)
//! 6. k-means on the n rows of the embedding
//! ```
//!
//! `L_n` is positive semi-definite with eigenvalues in `[0, 2]`; the
//! multiplicity of 0 equals the number of connected components. A node
//! of degree 0 makes `D^{-1/2}` undefined and is reported as
//! [`Error::DegenerateGraph`] instead of propagating NaNs.
//!
//! Both the eigensolver and the clustering step are type parameters, so the
//! pipeline can be exercised without faer or without k-means.
//!
//! # Example
//!
//! ```rust
//! use eigenmap::cluster::LaplacianEigenmaps;
//! use petgraph::graph::UnGraph;
//!
//! // Two triangles joined by one edge.
//! let graph = UnGraph::<(), ()>::from_edges([
//!     (0, 1), (1, 2), (0, 2),
//!     (3, 4), (4, 5), (3, 5),
//!     (2, 3),
//! ]);
//!
//! let labels = LaplacianEigenmaps::new(2, 1)
//!     .with_seed(42)
//!     .fit(&graph)
//!     .unwrap();
//!
//! assert_eq!(labels.len(), 6);
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[5]);
//! ```
//!
//! # References
//!
//! - Belkin, Niyogi (2003). "Laplacian Eigenmaps for Dimensionality Reduction
//!   and Data Representation"
//! - von Luxburg (2007). "A Tutorial on Spectral Clustering"

use faer::{Mat, MatRef};
use ndarray::Array2;
use petgraph::graph::UnGraph;
use tracing::debug;

use super::eigen::{FaerEigensolver, SymmetricEigensolver};
use super::kmeans::Kmeans;
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::graph::{AdjacencyMatrix, EdgeWeight};

/// Plain parameters for [`LaplacianEigenmaps`] with the default backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectralConfig {
    /// Number of k-means clusters.
    pub n_clusters: usize,
    /// Embedding dimension (eigenvectors kept after the trivial one).
    pub n_components: usize,
    /// k-means seed; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            n_clusters: 2,
            n_components: 2,
            seed: Some(42),
        }
    }
}

impl From<SpectralConfig> for LaplacianEigenmaps {
    fn from(config: SpectralConfig) -> Self {
        let model = LaplacianEigenmaps::new(config.n_clusters, config.n_components);
        match config.seed {
            Some(seed) => model.with_seed(seed),
            None => model,
        }
    }
}

/// Spectral clustering of graph nodes.
///
/// `S` decomposes the normalized Laplacian, `C` partitions the embedding.
#[derive(Debug, Clone)]
pub struct LaplacianEigenmaps<S = FaerEigensolver, C = Kmeans> {
    /// Number of clusters
    n_clusters: usize,
    /// Embedding dimension
    n_components: usize,
    solver: S,
    clustering: C,
}

impl LaplacianEigenmaps {
    /// Spectral clustering into `n_clusters` groups over an
    /// `n_components`-dimensional embedding, using faer and k-means.
    ///
    /// A graph made of `n_clusters` disconnected groups is split exactly
    /// along them when `n_components == n_clusters - 1`: the embedding is
    /// then the rest of the Laplacian null space, constant on each group.
    /// Fewer components can leave two groups at the same point; more add
    /// non-null eigenvectors that vary inside groups.
    pub fn new(n_clusters: usize, n_components: usize) -> Self {
        Self {
            n_clusters,
            n_components,
            solver: FaerEigensolver,
            clustering: Kmeans::new(n_clusters),
        }
    }
}

impl<S> LaplacianEigenmaps<S, Kmeans> {
    /// Seed the k-means initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.clustering = self.clustering.with_seed(seed);
        self
    }

    /// Set the number of k-means restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.clustering = self.clustering.with_n_init(n_init);
        self
    }

    /// Set the k-means iteration cap.
    pub fn with_kmeans_max_iter(mut self, max_iter: usize) -> Self {
        self.clustering = self.clustering.with_max_iter(max_iter);
        self
    }
}

impl<S, C> LaplacianEigenmaps<S, C>
where
    S: SymmetricEigensolver,
    C: Clustering,
{
    /// Replace the eigensolver.
    pub fn with_eigensolver<S2: SymmetricEigensolver>(
        self,
        solver: S2,
    ) -> LaplacianEigenmaps<S2, C> {
        LaplacianEigenmaps {
            n_clusters: self.n_clusters,
            n_components: self.n_components,
            solver,
            clustering: self.clustering,
        }
    }

    /// Replace the clustering step. Its cluster count must match `n_clusters`.
    pub fn with_clustering<C2: Clustering>(self, clustering: C2) -> LaplacianEigenmaps<S, C2> {
        LaplacianEigenmaps {
            n_clusters: self.n_clusters,
            n_components: self.n_components,
            solver: self.solver,
            clustering,
        }
    }

    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Embedding dimension.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Cluster the nodes of `graph`.
    ///
    /// Returns one label per node, indexed by `NodeIndex::index()`, each in
    /// `0..n_clusters`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for a graph without nodes
    /// - [`Error::InvalidParameter`] when `n_clusters` or `n_components`
    ///   don't fit the graph size
    /// - [`Error::DegenerateGraph`] when a node has zero degree
    /// - [`Error::SelfLoop`] when the graph has a self-loop
    pub fn fit<N, E: EdgeWeight>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        let n = graph.node_count();
        self.validate(n)?;

        let embedding = self.embed_validated(graph)?;
        let rows: Vec<Vec<f64>> = embedding.outer_iter().map(|row| row.to_vec()).collect();
        let labels = self.clustering.fit_predict(&rows)?;

        if labels.len() != n {
            return Err(Error::invalid(
                "clustering",
                format!("returned {} labels for {n} nodes", labels.len()),
            ));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= self.n_clusters) {
            return Err(Error::invalid(
                "clustering",
                format!("label {bad} outside 0..{}", self.n_clusters),
            ));
        }

        Ok(labels)
    }

    /// The `n × n_components` spectral embedding of `graph`.
    ///
    /// Row `i` is the embedding of node `i`.
    pub fn embed<N, E: EdgeWeight>(&self, graph: &UnGraph<N, E>) -> Result<Array2<f64>> {
        self.validate(graph.node_count())?;
        self.embed_validated(graph)
    }

    fn embed_validated<N, E: EdgeWeight>(&self, graph: &UnGraph<N, E>) -> Result<Array2<f64>> {
        let adjacency = AdjacencyMatrix::from_graph(graph)?;
        let laplacian = normalized_laplacian(&adjacency)?;
        spectral_embedding(laplacian.as_ref(), self.n_components, &self.solver)
    }

    fn validate(&self, n: usize) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::invalid("n_clusters", "must be at least 1"));
        }
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.n_components == 0 || self.n_components >= n {
            return Err(Error::invalid(
                "n_components",
                format!(
                    "must be in 1..{n} for a graph with {n} nodes, got {}",
                    self.n_components
                ),
            ));
        }
        if self.n_clusters > n {
            return Err(Error::invalid(
                "n_clusters",
                format!("cannot create {} clusters from {n} nodes", self.n_clusters),
            ));
        }
        if self.clustering.n_clusters() != self.n_clusters {
            return Err(Error::invalid(
                "clustering",
                format!(
                    "clusterer produces {} clusters, expected {}",
                    self.clustering.n_clusters(),
                    self.n_clusters
                ),
            ));
        }
        Ok(())
    }
}

/// Cluster `graph` with the default faer + k-means pipeline.
///
/// Shorthand for `LaplacianEigenmaps::new(n_clusters, n_components)` with an
/// optional seed.
pub fn laplacian_eigenmaps<N, E: EdgeWeight>(
    graph: &UnGraph<N, E>,
    n_clusters: usize,
    n_components: usize,
    seed: Option<u64>,
) -> Result<Vec<usize>> {
    let model: LaplacianEigenmaps = SpectralConfig {
        n_clusters,
        n_components,
        seed,
    }
    .into();
    model.fit(graph)
}

/// `L_n = D^{-1/2} (D - A) D^{-1/2}`.
///
/// Uses the elementwise inverse square root of the degrees, so the diagonal
/// of the result is 1 for every node.
///
/// # Errors
///
/// [`Error::DegenerateGraph`] naming the first node with zero degree.
pub fn normalized_laplacian(adjacency: &AdjacencyMatrix) -> Result<Mat<f64>> {
    let n = adjacency.n();
    if n == 0 {
        return Err(Error::EmptyInput);
    }

    let degrees = adjacency.degrees();
    let mut inv_sqrt = Vec::with_capacity(n);
    for (node, &d) in degrees.iter().enumerate() {
        if d <= 0.0 {
            return Err(Error::DegenerateGraph { node });
        }
        inv_sqrt.push(1.0 / d.sqrt());
    }

    let a = adjacency.as_ref();
    Ok(Mat::from_fn(n, n, |i, j| {
        let l = if i == j { degrees[i] - a[(i, j)] } else { -a[(i, j)] };
        inv_sqrt[i] * l * inv_sqrt[j]
    }))
}

/// Embed nodes with eigenvectors `1..=n_components` of `laplacian`.
///
/// The eigenvector of the smallest eigenvalue is skipped.
pub fn spectral_embedding<S: SymmetricEigensolver + ?Sized>(
    laplacian: MatRef<'_, f64>,
    n_components: usize,
    solver: &S,
) -> Result<Array2<f64>> {
    let n = laplacian.nrows();
    if n_components == 0 || n_components >= n {
        return Err(Error::invalid(
            "n_components",
            format!("must be in 1..{n}, got {n_components}"),
        ));
    }

    let eig = solver.eigh(laplacian)?.into_ascending(n)?;
    debug!(
        n,
        n_components,
        lambda = ?&eig.values[..(n_components + 1)],
        "laplacian spectrum"
    );

    let vectors = &eig.vectors;
    Ok(Array2::from_shape_fn((n, n_components), |(i, c)| {
        vectors[(i, c + 1)]
    }))
}
