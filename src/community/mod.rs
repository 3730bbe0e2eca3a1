//! Modularity-based community analysis.
//!
//! Given a graph, find groupings where nodes within groups are densely
//! connected and connections between groups are sparse.
//!
//! ## The Modularity Objective
//!
//! **Modularity** Q compares the edge weight inside communities to the
//! weight expected in a random graph with the same degree sequence:
//!
//! ```text
//! Q = (1/2m) × Σ[A_ij - (k_i × k_j)/(2m)] × δ(c_i, c_j)
//! ```
//!
//! Where:
//! - m = total edge weight
//! - A_ij = edge weight between i and j
//! - k_i = weighted degree of node i
//! - δ(c_i, c_j) = 1 if i and j are in same community
//!
//! A good partition has Q > 0. Q is at most 1 and is 0 for the trivial
//! one-community partition.
//!
//! ## Girvan–Newman Sweep
//!
//! [`GirvanNewman`] produces a hierarchy of partitions by cutting
//! high-betweenness edges; [`modularity_sweep`] scores each level so the
//! number of communities with maximum modularity can be read off.
//!
//! ```rust
//! use eigenmap::community::modularity_sweep;
//! use petgraph::graph::UnGraph;
//!
//! let graph = UnGraph::<(), ()>::from_edges([
//!     (0, 1), (1, 2), (0, 2),
//!     (3, 4), (4, 5), (3, 5),
//!     (2, 3),
//! ]);
//! let sweep = modularity_sweep(&graph, 3).unwrap();
//! assert_eq!(sweep.best().unwrap().community_count, 2);
//! ```
//!
//! ## References
//!
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."

mod girvan_newman;
mod modularity;

pub use girvan_newman::{modularity_sweep, GirvanNewman, ModularitySweep, SweepEntry};
pub use modularity::{modularity, modularity_labels};
