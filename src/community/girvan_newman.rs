//! Girvan–Newman divisive community detection.
//!
//! Repeatedly removes the edge with the highest **edge betweenness** (the
//! number of shortest paths running through it). Edges between communities
//! carry most inter-community paths, so removing them splits the graph
//! along community boundaries.
//!
//! ```text
//! loop:
//!   recompute edge betweenness (Brandes, unweighted)
//!   remove the top edge
//!   if #components increased: yield components
//! ```
//!
//! Each yielded partition has exactly one more community than the previous
//! one. The sequence ends when no edges remain.
//!
//! ## Complexity
//!
//! O(m · n · m) overall: each removal costs one O(n · m) betweenness pass.
//! Fine for exploratory graphs of a few hundred nodes.
//!
//! ## References
//!
//! - Girvan, Newman (2002). "Community structure in social and biological networks."
//! - Brandes (2001). "A faster algorithm for betweenness centrality."

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use tracing::{debug, trace};

use super::modularity::modularity;
use crate::error::{Error, Result};
use crate::graph::EdgeWeight;

/// Iterator over successively finer Girvan–Newman partitions.
///
/// Each item lists the communities as sorted node indices, ordered by their
/// smallest member.
#[derive(Debug, Clone)]
pub struct GirvanNewman {
    n: usize,
    /// Remaining edges in original `EdgeIndex` order.
    edges: Vec<(usize, usize)>,
    n_components: usize,
}

impl GirvanNewman {
    /// Start the sweep on `graph`.
    ///
    /// Self-loops are dropped and parallel edges collapsed; betweenness
    /// ignores edge weights.
    pub fn new<N, E>(graph: &UnGraph<N, E>) -> Self {
        let n = graph.node_count();
        let mut seen = HashSet::new();
        let mut edges = Vec::with_capacity(graph.edge_count());
        for edge in graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            if a == b {
                continue;
            }
            if seen.insert((a.min(b), a.max(b))) {
                edges.push((a, b));
            }
        }
        let n_components = connected_components(n, &edges).len();
        Self {
            n,
            edges,
            n_components,
        }
    }

    /// Edges not yet removed.
    pub fn remaining_edges(&self) -> usize {
        self.edges.len()
    }
}

impl Iterator for GirvanNewman {
    type Item = Vec<Vec<usize>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.edges.is_empty() {
            return None;
        }

        // Removing every edge leaves n singletons, so this loop always yields.
        loop {
            let scores = edge_betweenness(self.n, &self.edges);
            let mut top = 0;
            for (e, &score) in scores.iter().enumerate() {
                if score > scores[top] {
                    top = e;
                }
            }
            let (a, b) = self.edges.remove(top);
            trace!(a, b, betweenness = scores[top], "removed edge");

            let components = connected_components(self.n, &self.edges);
            if components.len() > self.n_components {
                self.n_components = components.len();
                debug!(
                    communities = components.len(),
                    remaining_edges = self.edges.len(),
                    "girvan-newman split"
                );
                return Some(components);
            }
        }
    }
}

/// One step of a [`ModularitySweep`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepEntry {
    /// Number of communities in `partition`.
    pub community_count: usize,
    /// Modularity of `partition` on the full graph.
    pub modularity: f64,
    /// Communities as sorted node indices.
    pub partition: Vec<Vec<usize>>,
}

/// Modularity of the Girvan–Newman partitions, coarse to fine.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModularitySweep {
    entries: Vec<SweepEntry>,
}

impl ModularitySweep {
    /// All steps, in increasing community count.
    pub fn entries(&self) -> &[SweepEntry] {
        &self.entries
    }

    /// Modularity per step.
    pub fn scores(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.modularity).collect()
    }

    /// The step with the highest modularity (earliest on ties).
    pub fn best(&self) -> Option<&SweepEntry> {
        self.entries.iter().fold(None, |best: Option<&SweepEntry>, e| match best {
            Some(b) if b.modularity >= e.modularity => Some(b),
            _ => Some(e),
        })
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the sweep produced no partitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Score every Girvan–Newman partition with at most `max_communities + 1`
/// communities.
///
/// For a connected graph that is the partitions into `2..=max_communities + 1`
/// communities, one entry each.
///
/// # Errors
///
/// [`Error::InvalidParameter`] when `max_communities` is 0.
pub fn modularity_sweep<N, E: EdgeWeight>(
    graph: &UnGraph<N, E>,
    max_communities: usize,
) -> Result<ModularitySweep> {
    if max_communities == 0 {
        return Err(Error::invalid("max_communities", "must be at least 1"));
    }
    let limit = max_communities + 1;

    let mut entries = Vec::new();
    for partition in GirvanNewman::new(graph) {
        if partition.len() > limit {
            break;
        }
        let q = modularity(graph, &partition)?;
        entries.push(SweepEntry {
            community_count: partition.len(),
            modularity: q,
            partition,
        });
    }

    Ok(ModularitySweep { entries })
}

/// Unnormalized edge betweenness via Brandes' accumulation.
///
/// Every unordered pair contributes from both endpoints, which doubles all
/// scores uniformly; only the ranking matters here.
fn edge_betweenness(n: usize, edges: &[(usize, usize)]) -> Vec<f64> {
    let mut adj: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (e, &(a, b)) in edges.iter().enumerate() {
        adj[a].push((b, e));
        adj[b].push((a, e));
    }

    let mut scores = vec![0.0; edges.len()];
    let mut dist = vec![usize::MAX; n];
    let mut sigma = vec![0.0f64; n];
    let mut delta = vec![0.0f64; n];
    let mut preds: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    let mut stack = Vec::with_capacity(n);
    let mut queue = VecDeque::with_capacity(n);

    for s in 0..n {
        dist.fill(usize::MAX);
        sigma.fill(0.0);
        delta.fill(0.0);
        preds.iter_mut().for_each(Vec::clear);

        dist[s] = 0;
        sigma[s] = 1.0;
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &(w, e) in &adj[v] {
                if dist[w] == usize::MAX {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    preds[w].push((v, e));
                }
            }
        }

        while let Some(w) = stack.pop() {
            for &(v, e) in &preds[w] {
                let c = sigma[v] / sigma[w] * (1.0 + delta[w]);
                scores[e] += c;
                delta[v] += c;
            }
        }
    }

    scores
}

/// Connected components, each sorted, ordered by smallest member.
fn connected_components(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::<usize>::new(n);
    for &(a, b) in edges {
        uf.union(a, b);
    }

    let mut index_of_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for node in 0..n {
        let root = uf.find_mut(node);
        let idx = *index_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[idx].push(node);
    }
    components
}
