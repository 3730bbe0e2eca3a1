//! Clustering of graph nodes through a spectral embedding.
//!
//! ## Laplacian Eigenmaps
//!
//! Nodes are mapped into ℝ^c using the eigenvectors of the normalized graph
//! Laplacian with the smallest non-zero eigenvalues. Densely connected groups
//! of nodes land close together, so a plain k-means on the embedding
//! recovers them:
//!
//! ```text
//! graph ──► A ──► L_n = D^{-1/2}(D − A)D^{-1/2} ──► eigh ──► U[:, 1..=c] ──► k-means
//! ```
//!
//! Two steps are delegated to swappable capabilities:
//!
//! | Step | Trait | Default |
//! |------|-------|---------|
//! | eigendecomposition | [`SymmetricEigensolver`] | [`FaerEigensolver`] |
//! | partitioning | [`Clustering`] | [`Kmeans`] |
//!
//! ## K-means
//!
//! Lloyd iterations from k-means++ seeds, repeated `n_init` times; the run
//! with the lowest within-cluster sum of squares wins. With a seed the whole
//! pipeline is reproducible; without one, cluster *ids* may change between
//! runs while the partition itself stays stable.
//!
//! ## Usage
//!
//! ```rust
//! use eigenmap::cluster::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(1).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod eigen;
mod kmeans;
mod spectral;
mod traits;

pub use eigen::{FaerEigensolver, SymmetricEigen, SymmetricEigensolver};
pub use kmeans::{Kmeans, KmeansFit};
pub use spectral::{
    laplacian_eigenmaps, normalized_laplacian, spectral_embedding, LaplacianEigenmaps,
    SpectralConfig,
};
pub use traits::Clustering;
