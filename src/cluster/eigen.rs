//! Symmetric eigendecomposition behind a swappable trait.
//!
//! The spectral pipeline only needs "eigenvalues ascending, eigenvectors as
//! matching columns" from a real symmetric matrix. [`FaerEigensolver`] is the
//! default; tests or callers with another backend implement
//! [`SymmetricEigensolver`] themselves.

use faer::{Mat, MatRef, Side};
use tracing::warn;

use crate::error::{Error, Result};

/// Eigenpairs of a real symmetric matrix.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues in ascending order.
    pub values: Vec<f64>,
    /// Eigenvectors as columns; column `k` pairs with `values[k]`.
    pub vectors: Mat<f64>,
}

/// A full eigensolver for real symmetric matrices.
pub trait SymmetricEigensolver {
    /// Decompose `matrix`, returning eigenvalues in ascending order.
    fn eigh(&self, matrix: MatRef<'_, f64>) -> Result<SymmetricEigen>;
}

/// Self-adjoint eigendecomposition from `faer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerEigensolver;

impl SymmetricEigensolver for FaerEigensolver {
    fn eigh(&self, matrix: MatRef<'_, f64>) -> Result<SymmetricEigen> {
        let n = check_square(matrix)?;

        let evd = matrix.selfadjoint_eigendecomposition(Side::Lower);
        let s = evd.s().column_vector();
        let values: Vec<f64> = (0..n).map(|i| s.read(i)).collect();
        let vectors = evd.u().to_owned();

        Ok(SymmetricEigen { values, vectors })
    }
}

impl SymmetricEigen {
    /// Check shape and finiteness, and put the pairs in ascending order.
    ///
    /// Backends that already sort (faer does) pass through untouched.
    pub(crate) fn into_ascending(self, n: usize) -> Result<Self> {
        if self.values.len() != n {
            return Err(Error::Eigensolver(format!(
                "expected {n} eigenvalues, got {}",
                self.values.len()
            )));
        }
        if self.vectors.nrows() != n || self.vectors.ncols() != n {
            return Err(Error::Eigensolver(format!(
                "expected {n}x{n} eigenvectors, got {}x{}",
                self.vectors.nrows(),
                self.vectors.ncols()
            )));
        }
        if let Some(v) = self.values.iter().find(|v| !v.is_finite()) {
            return Err(Error::Eigensolver(format!("non-finite eigenvalue {v}")));
        }

        if self.values.windows(2).all(|w| w[0] <= w[1]) {
            return Ok(self);
        }

        warn!(n, "eigensolver returned unsorted eigenvalues; reordering");
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        let values = order.iter().map(|&k| self.values[k]).collect();
        let vectors = Mat::from_fn(n, n, |i, j| self.vectors[(i, order[j])]);
        Ok(Self { values, vectors })
    }
}

fn check_square(matrix: MatRef<'_, f64>) -> Result<usize> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: matrix.ncols(),
        });
    }
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faer_eigh_diagonal() {
        let mut m = Mat::<f64>::zeros(3, 3);
        m[(0, 0)] = 3.0;
        m[(1, 1)] = 1.0;
        m[(2, 2)] = 2.0;

        let eig = FaerEigensolver.eigh(m.as_ref()).unwrap();
        let eig = eig.into_ascending(3).unwrap();

        assert_eq!(eig.values.len(), 3);
        assert!((eig.values[0] - 1.0).abs() < 1e-12);
        assert!((eig.values[1] - 2.0).abs() < 1e-12);
        assert!((eig.values[2] - 3.0).abs() < 1e-12);
        // Eigenvector of 1.0 is ±e1.
        assert!((eig.vectors[(1, 0)].abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_faer_eigh_reconstructs_matrix() {
        let m = Mat::from_fn(4, 4, |i, j| {
            if i == j {
                2.0
            } else if i.abs_diff(j) == 1 {
                -1.0
            } else {
                0.0
            }
        });
        let eig = FaerEigensolver.eigh(m.as_ref()).unwrap();

        for i in 0..4 {
            for j in 0..4 {
                let v: f64 = (0..4)
                    .map(|k| eig.vectors[(i, k)] * eig.values[k] * eig.vectors[(j, k)])
                    .sum();
                assert!((v - m[(i, j)]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_into_ascending_reorders_columns() {
        let eig = SymmetricEigen {
            values: vec![2.0, 0.5],
            vectors: Mat::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 }),
        };
        let eig = eig.into_ascending(2).unwrap();
        assert_eq!(eig.values, vec![0.5, 2.0]);
        assert_eq!(eig.vectors[(1, 0)], 1.0);
        assert_eq!(eig.vectors[(0, 1)], 1.0);
    }

    #[test]
    fn test_into_ascending_rejects_wrong_shape() {
        let eig = SymmetricEigen {
            values: vec![1.0],
            vectors: Mat::zeros(2, 2),
        };
        assert!(matches!(eig.into_ascending(2), Err(Error::Eigensolver(_))));
    }

    #[test]
    fn test_non_square_rejected() {
        let m = Mat::<f64>::zeros(2, 3);
        assert!(matches!(
            FaerEigensolver.eigh(m.as_ref()),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
