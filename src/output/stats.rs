//! Statistics over a persisted or in-memory crawl
//!
//! This module provides functionality for summarizing the document store
//! and link graph and printing the result.

use crate::crawler::CrawlReport;
use crate::storage::{DocumentStore, LinkGraph};
use crate::url::extract_domain;
use std::collections::HashSet;
use url::Url;

/// Corpus statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Documents in the store
    pub documents: usize,

    /// Nodes in the link graph
    pub graph_nodes: usize,

    /// Distinct edges in the link graph
    pub graph_edges: usize,

    /// Graph nodes with no outbound edges
    pub dangling_nodes: usize,

    /// Graph nodes that were linked to but never stored
    pub unfetched_nodes: usize,

    /// Distinct hosts among graph nodes and documents
    pub unique_hosts: usize,
}

impl CrawlStatistics {
    /// Computes statistics from a document store and link graph
    pub fn collect(pages: &DocumentStore, graph: &LinkGraph) -> Self {
        let dangling_nodes = (0..graph.node_count())
            .filter(|&i| graph.out_degree(i) == 0)
            .count();
        let unfetched_nodes = graph
            .nodes()
            .iter()
            .filter(|url| !pages.contains(url))
            .count();

        let hosts: HashSet<String> = graph
            .nodes()
            .iter()
            .map(String::as_str)
            .chain(pages.iter().map(|doc| doc.url.as_str()))
            .filter_map(|url| Url::parse(url).ok())
            .filter_map(|url| extract_domain(&url))
            .collect();

        Self {
            documents: pages.len(),
            graph_nodes: graph.node_count(),
            graph_edges: graph.edge_count(),
            dangling_nodes,
            unfetched_nodes,
            unique_hosts: hosts.len(),
        }
    }

    /// Mean outbound edges per graph node
    pub fn mean_out_degree(&self) -> f64 {
        if self.graph_nodes == 0 {
            0.0
        } else {
            self.graph_edges as f64 / self.graph_nodes as f64
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Corpus Statistics ===\n");

    println!("Documents:");
    println!("  Stored pages: {}", stats.documents);
    println!("  Unique hosts: {}", stats.unique_hosts);
    println!();

    println!("Link Graph:");
    println!("  Nodes: {}", stats.graph_nodes);
    println!("  Edges: {}", stats.graph_edges);
    println!("  Mean out-degree: {:.2}", stats.mean_out_degree());
    println!("  Dangling nodes: {}", stats.dangling_nodes);
    println!("  Linked but not fetched: {}", stats.unfetched_nodes);
}

/// Prints the counters of a finished crawl
pub fn print_crawl_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!("  Pages stored: {}", report.pages_stored);
    println!("  URLs visited: {}", report.visited);
    println!("  Fetch failures: {}", report.fetch_failures);
    println!(
        "  Rejected: {} (robots {}, normalization {}, budget {})",
        report.rejected(),
        report.rejected_robots,
        report.rejected_normalization,
        report.rejected_budget
    );
    println!(
        "  Graph: {} nodes, {} edges",
        report.graph_nodes, report.graph_edges
    );
    if report.failed_workers > 0 {
        println!("  Failed workers: {}", report.failed_workers);
    }
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
}
