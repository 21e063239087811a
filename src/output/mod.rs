//! Output module for crawl summaries and query results
//!
//! This module handles:
//! - Corpus and crawl statistics
//! - Printing ranked results with their evaluation metrics
//! - Listing stored pages with previews

pub mod stats;

pub use stats::{print_crawl_report, print_statistics, CrawlStatistics};

use crate::index::{EvaluationReport, RankedResult};

/// Prints ranked results and their evaluation metrics to stdout
///
/// Scores and metrics are shown to four decimals.
pub fn print_results(query: &str, results: &[RankedResult], metrics: &EvaluationReport) {
    println!("=== Results for \"{}\" ({}) ===\n", query, results.len());

    for (i, result) in results.iter().enumerate() {
        println!("{:>3}. {} [{:.4}]", i + 1, result.title, result.score);
        println!("     {}", result.url);
        if !result.snippet.is_empty() {
            println!("     {}", result.snippet);
        }
        println!();
    }

    if !results.is_empty() {
        println!(
            "Precision: {:.4}  Recall: {:.4}  F1: {:.4}  NDCG: {:.4}",
            metrics.precision, metrics.recall, metrics.f1, metrics.ndcg
        );
    }
}

/// Prints `(url, preview)` pairs as produced by the page listing
pub fn print_page_list(pages: &[(&str, String)]) {
    println!("=== Stored Pages ({}) ===\n", pages.len());
    for (url, preview) in pages {
        println!("{}", url);
        println!("  {}", preview);
        println!();
    }
}
