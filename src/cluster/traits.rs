//! Clustering traits.

use crate::error::Result;

/// A hard clustering of points in ℝ^d.
///
/// [`LaplacianEigenmaps`](super::LaplacianEigenmaps) takes any implementor,
/// so the embedding can be partitioned by something other than [`Kmeans`](super::Kmeans).
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns one label per input point, each in `0..self.n_clusters()`.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}
