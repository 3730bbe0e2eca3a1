//! Cohesive substructures: k-cores and cliques.
//!
//! Both answer "where is the graph densest?" at different strictness:
//!
//! | Structure | Requirement | Count |
//! |-----------|-------------|-------|
//! | k-core | every node has ≥ k neighbours inside | one per k, nested |
//! | clique | every pair of nodes is adjacent | possibly exponential |
//!
//! A clique of size s lies inside the (s−1)-core, so the maximum core
//! number bounds the clique number from above (plus one).
//!
//! ```rust
//! use eigenmap::structure::{largest_cliques, KCoreDecomposition};
//! use petgraph::graph::UnGraph;
//!
//! let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2), (2, 3)]);
//!
//! let cores = KCoreDecomposition::compute(&graph).unwrap();
//! assert_eq!(cores.max_core(), 2);
//!
//! let largest = largest_cliques(&graph);
//! assert_eq!(largest.cliques(), &[vec![0, 1, 2]]);
//! ```

mod cliques;
mod kcore;

pub use cliques::{find_cliques, largest_cliques, LargestCliques};
pub use kcore::{core_number, k_core, KCoreDecomposition};
