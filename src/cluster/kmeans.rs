//! K-means clustering.
//!
//! Partitions points into k clusters by minimizing the **within-cluster sum
//! of squares** (inertia):
//!
//! ```text
//! J = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids with k-means++
//! 2. **Assign**: each point → nearest centroid
//! 3. **Update**: each centroid → mean of its points
//! 4. Repeat until the assignment is stable, or the centroids move less
//!    than the tolerance
//!
//! The tolerance is relative to the data: `tol` times the mean per-feature
//! variance, so rescaling the points never changes where Lloyd stops.
//!
//! Lloyd only finds a local minimum, so [`Kmeans`] runs `n_init`
//! independent initializations and keeps the lowest inertia.
//!
//! ## K-means++ Initialization
//!
//! 1. Choose the first centroid uniformly at random
//! 2. Choose each next centroid with probability proportional to D(x)²,
//!    the squared distance to the nearest centroid chosen so far
//!
//! Points that coincide with an existing centroid have D(x) = 0 and are
//! never picked again, so k well-separated groups of identical points get
//! one centroid each.

use super::traits::Clustering;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum Lloyd iterations per run.
    max_iter: usize,
    /// Convergence tolerance on total squared centroid shift, relative to
    /// the mean per-feature variance of the data.
    tol: f64,
    /// Independent k-means++ restarts.
    n_init: usize,
    /// Random seed.
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Label per input point, in `0..k`.
    pub labels: Vec<usize>,
    /// Final centroids, `k × d`.
    pub centroids: Array2<f64>,
    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the winning run.
    pub n_iter: usize,
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            tol: 1e-4,
            n_init: 10,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance, relative to the data variance.
    ///
    /// `0.0` iterates until the assignment no longer changes.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the number of restarts (at least one run always happens).
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Fit and return labels, centroids and inertia of the best restart.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for no points
    /// - [`Error::InvalidClusterCount`] when `k == 0` or `k > n`
    /// - [`Error::DimensionMismatch`] for ragged input
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = data.len();
        let d = data[0].len();

        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let mut flat: Vec<f64> = Vec::with_capacity(n * d);
        for point in data {
            if point.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: point.len(),
                });
            }
            flat.extend_from_slice(point);
        }
        let data_arr = Array2::from_shape_vec((n, d), flat).map_err(|_| {
            Error::DimensionMismatch {
                expected: n * d,
                found: data.iter().map(Vec::len).sum(),
            }
        })?;

        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };

        let tol = self.tol * mean_variance(&data_arr);

        let mut best: Option<KmeansFit> = None;
        for run in 0..self.n_init.max(1) {
            let fit = self.run_once(&data_arr, tol, &mut rng);
            trace!(run, inertia = fit.inertia, n_iter = fit.n_iter, "k-means run");
            match &best {
                Some(b) if b.inertia <= fit.inertia => {}
                _ => best = Some(fit),
            }
        }

        // n_init.max(1) guarantees at least one run.
        let best = best.ok_or(Error::EmptyInput)?;
        debug!(
            n,
            k = self.k,
            inertia = best.inertia,
            n_iter = best.n_iter,
            "k-means fit"
        );
        Ok(best)
    }

    fn run_once(&self, data: &Array2<f64>, tol: f64, rng: &mut StdRng) -> KmeansFit {
        let n = data.nrows();
        let d = data.ncols();

        let mut centroids = self.init_centroids(data, rng);
        let mut labels = vec![0usize; n];
        let mut previous: Option<Vec<usize>> = None;
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;
            assign(data, &centroids, &mut labels);
            if previous.as_deref() == Some(labels.as_slice()) {
                break;
            }

            // Update step
            let mut new_centroids = Array2::<f64>::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];

            for (i, &c) in labels.iter().enumerate() {
                let mut row = new_centroids.row_mut(c);
                row += &data.row(i);
                counts[c] += 1;
            }

            for c in 0..self.k {
                if counts[c] > 0 {
                    new_centroids
                        .row_mut(c)
                        .mapv_inplace(|v| v / counts[c] as f64);
                } else {
                    // Empty cluster: reseat on the point worst served by its centroid.
                    let far = farthest_point(data, &centroids, &labels);
                    trace!(cluster = c, point = far, "reseeding empty cluster");
                    new_centroids.row_mut(c).assign(&data.row(far));
                    labels[far] = c;
                }
            }

            let shift: f64 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();

            centroids = new_centroids;
            previous = Some(labels.clone());

            if shift <= tol {
                break;
            }
        }

        // Final labels are measured against the converged centroids.
        let inertia = assign(data, &centroids, &mut labels);

        KmeansFit {
            labels,
            centroids,
            inertia,
            n_iter,
        }
    }

    /// Initialize centroids using k-means++ algorithm.
    fn init_centroids(&self, data: &Array2<f64>, rng: &mut impl Rng) -> Array2<f64> {
        let n = data.nrows();
        let d = data.ncols();
        let mut centroids = Array2::zeros((self.k, d));

        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        // Squared distance of each point to its nearest chosen centroid.
        let mut distances: Vec<f64> = data
            .outer_iter()
            .map(|p| squared_distance(p, centroids.row(0)))
            .collect();

        for i in 1..self.k {
            let total: f64 = distances.iter().sum();
            let selected = if total > 0.0 {
                let threshold = rng.random::<f64>() * total;
                let fallback = distances.iter().rposition(|&dist| dist > 0.0).unwrap_or(0);
                let mut cumsum = 0.0;
                distances
                    .iter()
                    .position(|&dist| {
                        cumsum += dist;
                        dist > 0.0 && cumsum >= threshold
                    })
                    .unwrap_or(fallback)
            } else {
                rng.random_range(0..n)
            };

            centroids.row_mut(i).assign(&data.row(selected));
            for (j, dist) in distances.iter_mut().enumerate() {
                *dist = dist.min(squared_distance(data.row(j), centroids.row(i)));
            }
        }

        centroids
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.fit(data).map(|fit| fit.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(point: ArrayView1<'_, f64>, centroids: &Array2<f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, centroid) in centroids.outer_iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best.1 {
            best = (c, dist);
        }
    }
    best
}

/// Assign every point to its nearest centroid; returns the inertia.
fn assign(data: &Array2<f64>, centroids: &Array2<f64>, labels: &mut [usize]) -> f64 {
    #[cfg(feature = "parallel")]
    let dists: Vec<f64> = labels
        .par_iter_mut()
        .enumerate()
        .map(|(i, label)| {
            let (c, dist) = nearest(data.row(i), centroids);
            *label = c;
            dist
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let dists: Vec<f64> = labels
        .iter_mut()
        .enumerate()
        .map(|(i, label)| {
            let (c, dist) = nearest(data.row(i), centroids);
            *label = c;
            dist
        })
        .collect();

    // Summed in index order so the result does not depend on threading.
    dists.iter().sum()
}

/// Mean over features of the per-feature (population) variance.
fn mean_variance(data: &Array2<f64>) -> f64 {
    let (n, d) = data.dim();
    if n == 0 || d == 0 {
        return 0.0;
    }
    let total: f64 = data
        .columns()
        .into_iter()
        .map(|col| {
            let mean = col.sum() / n as f64;
            col.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64
        })
        .sum();
    total / d as f64
}

fn farthest_point(data: &Array2<f64>, centroids: &Array2<f64>, labels: &[usize]) -> usize {
    let mut far = (0, f64::NEG_INFINITY);
    for (i, &c) in labels.iter().enumerate() {
        let dist = squared_distance(data.row(i), centroids.row(c));
        if dist > far.1 {
            far = (i, dist);
        }
    }
    far.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ]
    }

    #[test]
    fn test_kmeans_basic() {
        let labels = Kmeans::new(2).with_seed(42).fit_predict(&two_blobs()).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_all_points_assigned() {
        let data: Vec<Vec<f64>> = (0..50)
            .map(|i| vec![i as f64 * 0.1, (i % 5) as f64])
            .collect();

        let labels = Kmeans::new(5).with_seed(123).fit_predict(&data).unwrap();

        assert_eq!(labels.len(), data.len());
        for &label in &labels {
            assert!(label < 5, "label {} out of range", label);
        }
    }

    #[test]
    fn test_kmeans_k_equals_n() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let labels = Kmeans::new(3).with_seed(42).fit_predict(&data).unwrap();

        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let a = Kmeans::new(2).with_seed(7).fit(&two_blobs()).unwrap();
        let b = Kmeans::new(2).with_seed(7).fit(&two_blobs()).unwrap();

        assert_eq!(a.labels, b.labels, "same seed should give same result");
        assert_eq!(a.inertia.to_bits(), b.inertia.to_bits());
    }

    #[test]
    fn test_kmeans_inertia_of_separated_blobs() {
        let fit = Kmeans::new(2).with_seed(1).fit(&two_blobs()).unwrap();
        // Each blob: two points 0.1·√2 apart, centroid in the middle.
        assert!((fit.inertia - 0.02).abs() < 1e-9, "inertia {}", fit.inertia);
        assert_eq!(fit.centroids.dim(), (2, 2));
    }

    #[test]
    fn test_kmeans_identical_groups_get_own_cluster() {
        let mut data = Vec::new();
        for g in 0..4 {
            for _ in 0..5 {
                data.push(vec![g as f64, (g * g) as f64]);
            }
        }
        let labels = Kmeans::new(4).with_seed(3).fit_predict(&data).unwrap();
        for g in 0..4 {
            let group = &labels[g * 5..(g + 1) * 5];
            assert!(group.iter().all(|&l| l == group[0]));
        }
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_kmeans_stopping_is_scale_invariant() {
        // Uneven 1-D spread: Lloyd needs several iterations from any seeding.
        let data: Vec<Vec<f64>> = (0..40)
            .map(|i| vec![(i * i % 97) as f64, (i % 7) as f64])
            .collect();
        // A power of two keeps every distance and mean exactly proportional.
        let scale = 1.0 / 1024.0;
        let small: Vec<Vec<f64>> = data
            .iter()
            .map(|p| p.iter().map(|x| x * scale).collect())
            .collect();

        for seed in 0..5 {
            let model = Kmeans::new(4).with_seed(seed).with_n_init(1);
            let big = model.fit(&data).unwrap();
            let tiny = model.fit(&small).unwrap();

            assert_eq!(big.labels, tiny.labels, "seed {seed}");
            assert_eq!(big.n_iter, tiny.n_iter, "seed {seed}");
            let expected = big.inertia * scale * scale;
            assert!((tiny.inertia - expected).abs() <= 1e-12 * expected.max(1e-300));
        }
    }

    #[test]
    fn test_kmeans_default_tol_matches_exact_convergence_on_small_data() {
        let centers = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        let jitter = [(0.0, 0.0), (0.01, 0.0), (0.0, 0.01), (0.01, 0.01)];
        let data: Vec<Vec<f64>> = centers
            .iter()
            .flat_map(|&(cx, cy)| {
                jitter
                    .iter()
                    .map(move |&(jx, jy)| vec![(cx + jx) * 1e-2, (cy + jy) * 1e-2])
            })
            .collect();

        for seed in 0..5 {
            let default = Kmeans::new(3).with_seed(seed).with_n_init(1).fit(&data).unwrap();
            let exact = Kmeans::new(3)
                .with_seed(seed)
                .with_n_init(1)
                .with_tol(0.0)
                .fit(&data)
                .unwrap();

            assert_eq!(default.labels, exact.labels, "seed {seed}");
            assert_eq!(default.inertia.to_bits(), exact.inertia.to_bits());
        }
    }

    #[test]
    fn test_mean_variance() {
        let data = Array2::from_shape_vec((4, 2), vec![0.0, 5.0, 2.0, 5.0, 0.0, 5.0, 2.0, 5.0])
            .unwrap();
        // Column 0 has variance 1, column 1 is constant.
        assert!((mean_variance(&data) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data: Vec<Vec<f64>> = vec![];
        assert_eq!(Kmeans::new(2).fit_predict(&data), Err(Error::EmptyInput));
    }

    #[test]
    fn test_kmeans_k_larger_than_n_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        assert!(matches!(
            Kmeans::new(5).fit_predict(&data),
            Err(Error::InvalidClusterCount {
                requested: 5,
                n_items: 2
            })
        ));
    }

    #[test]
    fn test_kmeans_ragged_input_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        assert!(matches!(
            Kmeans::new(1).fit_predict(&data),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
