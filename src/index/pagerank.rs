//! Iterative PageRank over a link graph
//!
//! Every graph node is ranked, including nodes that were linked to but never
//! fetched. Rank held by dangling nodes (no outbound edges) is spread
//! uniformly over all nodes each iteration, so the total stays at 1.0.

use crate::storage::LinkGraph;
use std::collections::HashMap;

/// Authority score per graph node
#[derive(Debug, Clone, Default)]
pub struct PageRankScores {
    nodes: Vec<String>,
    ranks: Vec<f64>,
    lookup: HashMap<String, usize>,
    iterations: usize,
}

impl PageRankScores {
    pub fn get(&self, url: &str) -> Option<f64> {
        self.lookup.get(url).map(|&i| self.ranks[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node URLs in graph order
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Scores in graph order
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    /// `(url, score)` pairs in graph order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.nodes
            .iter()
            .map(String::as_str)
            .zip(self.ranks.iter().copied())
    }

    /// Iterations run before convergence or the iteration cap
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Computes PageRank for every node of `graph`
///
/// Starts from a uniform `1/N` and iterates
/// `new(v) = (1-d)/N + d * dangling/N + d * sum(rank(u) / outdeg(u))`
/// over in-neighbours `u` of `v`, until the L1 change between iterations
/// drops below `tolerance` or `max_iterations` is reached.
pub fn compute_pagerank(
    graph: &LinkGraph,
    damping: f64,
    max_iterations: usize,
    tolerance: f64,
) -> PageRankScores {
    let n = graph.node_count();
    if n == 0 {
        return PageRankScores::default();
    }

    let nf = n as f64;
    let mut ranks = vec![1.0 / nf; n];
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;

        let dangling: f64 = (0..n)
            .filter(|&u| graph.out_degree(u) == 0)
            .map(|u| ranks[u])
            .sum();
        let base = (1.0 - damping) / nf + damping * dangling / nf;
        let mut next = vec![base; n];

        for (u, &rank) in ranks.iter().enumerate() {
            let successors = graph.successors_of(u);
            if successors.is_empty() {
                continue;
            }
            let share = damping * rank / successors.len() as f64;
            for &v in successors {
                next[v] += share;
            }
        }

        let delta: f64 = next
            .iter()
            .zip(&ranks)
            .map(|(a, b)| (a - b).abs())
            .sum();
        ranks = next;

        if delta < tolerance {
            break;
        }
    }

    tracing::debug!("PageRank over {} nodes ran {} iterations", n, iterations);

    let nodes = graph.nodes().to_vec();
    let lookup = nodes
        .iter()
        .enumerate()
        .map(|(i, url)| (url.clone(), i))
        .collect();

    PageRankScores {
        nodes,
        ranks,
        lookup,
        iterations,
    }
}
