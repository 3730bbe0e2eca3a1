//! Partition comparison.
//!
//! Cluster ids are arbitrary: k-means may call the same group `0` in one
//! run and `2` in the next. These functions compare the *partitions* two
//! label vectors induce, never the raw ids.
//!
//! | Function | Range | Identical partitions |
//! |----------|-------|----------------------|
//! | [`same_partition`] | bool | `true` |
//! | [`ari`] | [-1, 1] | 1 |
//! | [`nmi`] | [0, 1] | 1 |
//!
//! # Example
//!
//! ```rust
//! use eigenmap::metrics::{ari, same_partition};
//!
//! let a = [0, 0, 1, 1, 2];
//! let b = [2, 2, 0, 0, 1];
//! assert!(same_partition(&a, &b));
//! assert!((ari(&a, &b) - 1.0).abs() < 1e-12);
//! ```
//!
//! # References
//!
//! - Hubert & Arabie (1985). "Comparing partitions" (ARI)
//! - Strehl & Ghosh (2002). "Cluster ensembles" (NMI)

use std::collections::BTreeMap;

/// Whether `a` and `b` group the items identically, up to relabeling.
///
/// Vectors of different lengths never match.
pub fn same_partition(a: &[usize], b: &[usize]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut forward: BTreeMap<usize, usize> = BTreeMap::new();
    let mut backward: BTreeMap<usize, usize> = BTreeMap::new();
    a.iter().zip(b).all(|(&x, &y)| {
        *forward.entry(x).or_insert(y) == y && *backward.entry(y).or_insert(x) == x
    })
}

/// Adjusted Rand Index between two labelings.
///
/// Returns 0.0 for mismatched lengths or empty input.
pub fn ari(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let table = Contingency::new(pred, truth);

    let sum_comb_ij: f64 = table.joint.values().map(|&c| comb2(c)).sum();
    let sum_comb_a: f64 = table.rows.values().map(|&c| comb2(c)).sum();
    let sum_comb_b: f64 = table.cols.values().map(|&c| comb2(c)).sum();
    let comb_n = comb2(table.n);

    if comb_n == 0.0 {
        return 1.0;
    }

    let expected = sum_comb_a * sum_comb_b / comb_n;
    let max_index = (sum_comb_a + sum_comb_b) / 2.0;
    let denom = max_index - expected;
    if denom.abs() < 1e-12 {
        // Both labelings are trivial (all-one or all-singletons).
        return if same_partition(pred, truth) { 1.0 } else { 0.0 };
    }

    (sum_comb_ij - expected) / denom
}

/// Normalized mutual information, `2·I(U;V) / (H(U) + H(V))`.
///
/// Returns 0.0 for mismatched lengths or empty input, and 1.0 when both
/// labelings put everything in one cluster.
pub fn nmi(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let table = Contingency::new(pred, truth);
    let n = table.n as f64;

    let entropy = |counts: &BTreeMap<usize, usize>| -> f64 {
        counts
            .values()
            .map(|&c| {
                let p = c as f64 / n;
                -p * p.ln()
            })
            .sum()
    };
    let h_pred = entropy(&table.rows);
    let h_truth = entropy(&table.cols);

    if h_pred + h_truth == 0.0 {
        return 1.0;
    }

    let mi: f64 = table
        .joint
        .iter()
        .map(|(&(p, t), &c)| {
            let p_joint = c as f64 / n;
            let p_p = table.rows[&p] as f64 / n;
            let p_t = table.cols[&t] as f64 / n;
            p_joint * (p_joint / (p_p * p_t)).ln()
        })
        .sum();

    (2.0 * mi / (h_pred + h_truth)).clamp(0.0, 1.0)
}

struct Contingency {
    joint: BTreeMap<(usize, usize), usize>,
    rows: BTreeMap<usize, usize>,
    cols: BTreeMap<usize, usize>,
    n: usize,
}

impl Contingency {
    fn new(pred: &[usize], truth: &[usize]) -> Self {
        let mut joint = BTreeMap::new();
        let mut rows = BTreeMap::new();
        let mut cols = BTreeMap::new();
        for (&p, &t) in pred.iter().zip(truth) {
            *joint.entry((p, t)).or_insert(0) += 1;
            *rows.entry(p).or_insert(0) += 1;
            *cols.entry(t).or_insert(0) += 1;
        }
        Self {
            joint,
            rows,
            cols,
            n: pred.len(),
        }
    }
}

fn comb2(n: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        (n * (n - 1) / 2) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_partition_relabel() {
        assert!(same_partition(&[0, 0, 1, 2], &[5, 5, 3, 9]));
        assert!(!same_partition(&[0, 0, 1, 1], &[0, 1, 1, 1]));
        // Merging two groups is not the same partition.
        assert!(!same_partition(&[0, 1, 2], &[0, 0, 1]));
        assert!(!same_partition(&[0, 0, 1], &[0, 1, 2]));
        assert!(!same_partition(&[0], &[0, 0]));
    }

    #[test]
    fn test_ari_perfect_and_random() {
        assert!((ari(&[0, 0, 1, 1], &[1, 1, 0, 0]) - 1.0).abs() < 1e-12);
        assert!(ari(&[0, 1, 0, 1], &[0, 0, 1, 1]) < 0.1);
    }

    #[test]
    fn test_nmi_perfect() {
        assert!((nmi(&[0, 0, 1, 1, 2, 2], &[2, 2, 0, 0, 1, 1]) - 1.0).abs() < 1e-12);
        assert!(nmi(&[0, 1, 0, 1], &[0, 0, 1, 1]) < 0.5);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(ari(&[], &[]), 0.0);
        assert_eq!(nmi(&[0], &[0, 1]), 0.0);
        assert_eq!(ari(&[0, 0, 0], &[1, 1, 1]), 1.0);
        assert_eq!(nmi(&[0, 0, 0], &[1, 1, 1]), 1.0);
    }

    proptest! {
        #[test]
        fn relabeling_preserves_partition(
            labels in proptest::collection::vec(0usize..5, 1..40),
            shift in 1usize..100,
        ) {
            let relabeled: Vec<usize> = labels.iter().map(|&l| (l + shift) * 7).collect();
            prop_assert!(same_partition(&labels, &relabeled));
            prop_assert!((ari(&labels, &relabeled) - 1.0).abs() < 1e-9);
        }
    }
}
