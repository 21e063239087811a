//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with content-type filtering
//! - HTML parsing, visible-text and link extraction
//! - The shared FIFO frontier and worker pool
//! - Persisting the resulting document store and link graph

mod coordinator;
mod fetcher;
mod frontier;
mod page;
mod parser;

pub use coordinator::{CrawlReport, CrawlResult, CrawlSession};
pub use fetcher::{build_http_client, fetch_url, is_html_content_type, user_agent_string, FetchResult};
pub use frontier::{Frontier, FrontierItem, TaskGuard};
pub use page::{extract_page, fetch_document, ExtractedPage};
pub use parser::{parse_html, ParsedPage};

use crate::config::Config;
use crate::storage::{DocumentStore, JsonStorage, LinkGraph, Storage};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// What a finished crawl produced and where it was written
#[derive(Debug, Clone)]
pub struct CrawlOutput {
    pub pages: DocumentStore,
    pub graph: LinkGraph,
    pub report: CrawlReport,
    /// Present when the pages file was written successfully
    pub pages_path: Option<PathBuf>,
    /// Present when the graph file was written successfully
    pub graph_path: Option<PathBuf>,
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build a fresh crawl session (HTTP client, robots cache, frontier)
/// 2. Crawl from the configured seeds under the page budget
/// 3. Persist the document store and link graph as JSON
///
/// A persistence failure is logged and reported through a `None` path;
/// the in-memory results are still returned.
///
/// # Errors
///
/// Fails only if the HTTP client cannot be built.
pub async fn crawl(config: &Config) -> Result<CrawlOutput> {
    let session = Arc::new(CrawlSession::new(config)?);
    let result = session.run(&config.crawler.seeds).await;

    let storage = JsonStorage::new(&config.output.pages_path, &config.output.graph_path);
    let pages_path = match storage.save_pages(&result.pages) {
        Ok(()) => {
            tracing::info!(
                "Saved {} pages to {}",
                result.pages.len(),
                storage.pages_path().display()
            );
            Some(storage.pages_path().to_path_buf())
        }
        Err(e) => {
            tracing::error!("Failed to save pages: {}", e);
            None
        }
    };
    let graph_path = match storage.save_graph(&result.graph) {
        Ok(()) => {
            tracing::info!(
                "Saved link graph ({} nodes) to {}",
                result.graph.node_count(),
                storage.graph_path().display()
            );
            Some(storage.graph_path().to_path_buf())
        }
        Err(e) => {
            tracing::error!("Failed to save link graph: {}", e);
            None
        }
    };

    Ok(CrawlOutput {
        pages: result.pages,
        graph: result.graph,
        report: result.report,
        pages_path,
        graph_path,
    })
}
