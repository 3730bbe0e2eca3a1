//! Structure report for a small collaboration network.
//!
//! Three marketing teams, a few cross-team contacts and one freelancer
//! attached to a single person. Prints k-core shells, the largest cliques,
//! the Girvan–Newman modularity sweep and the spectral clustering.
//!
//! ```bash
//! RUST_LOG=eigenmap=debug cargo run --example community_report
//! ```

use eigenmap::metrics::{ari, nmi};
use eigenmap::{
    largest_cliques, modularity_sweep, KCoreDecomposition, LaplacianEigenmaps, SpectralConfig,
};
use petgraph::graph::{NodeIndex, UnGraph};
use tracing_subscriber::EnvFilter;

const TEAMS: [&[&str]; 3] = [
    &["Anna K.", "Boris L.", "Vera M.", "Gleb N.", "Dina O."],
    &["Egor P.", "Zhanna R.", "Ilya S.", "Kira T."],
    &["Lev U.", "Maria F.", "Nikita H.", "Olga C.", "Pavel S."],
];

const CROSS_TEAM: [(&str, &str, f64); 4] = [
    ("Dina O.", "Egor P.", 1.0),
    ("Kira T.", "Lev U.", 1.0),
    ("Anna K.", "Olga C.", 0.5),
    ("Freelancer", "Pavel S.", 0.5),
];

fn build() -> UnGraph<&'static str, f64> {
    let mut graph = UnGraph::new_undirected();
    let mut index = std::collections::HashMap::new();

    for team in TEAMS {
        let nodes: Vec<_> = team
            .iter()
            .map(|&name| {
                let idx = graph.add_node(name);
                let _ = index.insert(name, idx);
                idx
            })
            .collect();
        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                let _ = graph.add_edge(a, b, 1.0);
            }
        }
    }
    // The freelancer only knows one person.
    let _ = index.insert("Freelancer", graph.add_node("Freelancer"));

    for (a, b, w) in CROSS_TEAM {
        let _ = graph.add_edge(index[a], index[b], w);
    }
    graph
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let graph = build();
    let name = |i: usize| graph[NodeIndex::new(i)];
    println!(
        "{} people, {} contacts\n",
        graph.node_count(),
        graph.edge_count()
    );

    let cores = KCoreDecomposition::compute(&graph)?;
    println!("k-core shells:");
    for (k, size) in cores.shell_sizes().iter().enumerate() {
        if *size == 0 {
            continue;
        }
        let members: Vec<_> = cores.shell_nodes(k).into_iter().map(name).collect();
        println!("  shell {k}: {}", members.join(", "));
    }

    let cliques = largest_cliques(&graph);
    println!(
        "\n{} largest clique(s) of size {}:",
        cliques.len(),
        cliques.clique_size()
    );
    for clique in cliques.cliques() {
        let members: Vec<_> = clique.iter().map(|&i| name(i)).collect();
        println!("  {}", members.join(", "));
    }

    let sweep = modularity_sweep(&graph, 6)?;
    println!("\nGirvan–Newman sweep:");
    for entry in sweep.entries() {
        println!(
            "  {:>2} communities  Q = {:.4}",
            entry.community_count, entry.modularity
        );
    }
    let best = sweep.best().ok_or("graph has no edges")?;
    println!("  best: {} communities", best.community_count);

    let config = SpectralConfig {
        n_clusters: best.community_count,
        n_components: best.community_count.saturating_sub(1).max(1),
        seed: Some(42),
    };
    let model: LaplacianEigenmaps = config.into();
    let labels = model.fit(&graph)?;
    println!("\nspectral clustering ({} clusters):", config.n_clusters);
    for cluster in 0..config.n_clusters {
        let members: Vec<_> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == cluster)
            .map(|(i, _)| name(i))
            .collect();
        println!("  {cluster}: {}", members.join(", "));
    }

    let mut sweep_labels = vec![0; graph.node_count()];
    for (c, members) in best.partition.iter().enumerate() {
        for &v in members {
            sweep_labels[v] = c;
        }
    }
    println!(
        "\nagreement with best sweep partition: ARI {:.3}, NMI {:.3}",
        ari(&labels, &sweep_labels),
        nmi(&labels, &sweep_labels)
    );

    Ok(())
}
