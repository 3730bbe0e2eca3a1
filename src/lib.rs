//! # eigenmap
//!
//! Exploratory structure analysis for undirected (optionally weighted)
//! `petgraph` graphs, such as social or marketing networks:
//!
//! - [`cluster`]: spectral clustering via Laplacian eigenmaps + k-means
//! - [`community`]: modularity and the Girvan–Newman modularity sweep
//! - [`structure`]: k-core decomposition and maximal cliques
//! - [`metrics`]: relabeling-invariant partition comparison
//!
//! Every per-node result is indexed by `NodeIndex::index()`, the node
//! insertion order of the input graph.
//!
//! ```rust
//! use eigenmap::{laplacian_eigenmaps, modularity_sweep, KCoreDecomposition};
//! use petgraph::graph::UnGraph;
//!
//! let graph = UnGraph::<(), ()>::from_edges([
//!     (0, 1), (1, 2), (0, 2),
//!     (3, 4), (4, 5), (3, 5),
//!     (2, 3),
//! ]);
//!
//! let labels = laplacian_eigenmaps(&graph, 2, 1, Some(7)).unwrap();
//! assert_eq!(labels.len(), 6);
//!
//! let sweep = modularity_sweep(&graph, 3).unwrap();
//! assert_eq!(sweep.best().unwrap().community_count, 2);
//!
//! let cores = KCoreDecomposition::compute(&graph).unwrap();
//! assert_eq!(cores.max_core(), 2);
//! ```

pub mod cluster;
pub mod community;
/// Error types used across `eigenmap`.
pub mod error;
pub mod graph;
pub mod metrics;
pub mod structure;

pub use error::{Error, Result};
pub use graph::{adjacency_matrix, AdjacencyMatrix, EdgeWeight};
pub use metrics::{ari, nmi, same_partition};

pub use cluster::{
    laplacian_eigenmaps, Clustering, FaerEigensolver, Kmeans, LaplacianEigenmaps,
    SpectralConfig, SymmetricEigensolver,
};
pub use community::{modularity, modularity_sweep, GirvanNewman, ModularitySweep};
pub use structure::{core_number, find_cliques, k_core, largest_cliques, KCoreDecomposition};
