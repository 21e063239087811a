//! Crawl session - worker pool and shared crawl state
//!
//! A [`CrawlSession`] is built fresh for every crawl and shared with its
//! workers through an `Arc`. It owns:
//! - the FIFO [`Frontier`] workers dequeue from
//! - one coarse lock over page states, link graph and document store
//! - the robots.txt gatekeeper (its own lock)
//!
//! Recording a fetched page (store insert, Visited transition, graph edges,
//! admission of new links under the page budget) happens in one critical
//! section, so no worker ever sees a half-recorded page.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::{Frontier, FrontierItem, TaskGuard};
use crate::crawler::page::{fetch_document, ExtractedPage};
use crate::robots::RobotsGatekeeper;
use crate::state::{PageState, RejectReason};
use crate::storage::{DocumentStore, LinkGraph};
use crate::url::normalize_url;
use crate::{Result, SearchError};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use url::Url;

/// Counters collected while crawling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Documents recorded in the store
    pub pages_stored: usize,
    /// URLs that reached Visited (successful or not)
    pub visited: usize,
    /// Visited URLs whose fetch failed
    pub fetch_failures: usize,
    pub rejected_robots: usize,
    pub rejected_normalization: usize,
    pub rejected_budget: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    /// Worker tasks that panicked; their siblings kept crawling
    pub failed_workers: usize,
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn rejected(&self) -> usize {
        self.rejected_robots + self.rejected_normalization + self.rejected_budget
    }
}

/// In-memory outcome of a finished crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    pub pages: DocumentStore,
    pub graph: LinkGraph,
    pub report: CrawlReport,
}

/// State guarded by the session's single lock
#[derive(Debug, Default)]
struct CrawlState {
    pages: HashMap<String, PageState>,
    /// URLs currently Queued, including those a worker is fetching
    queued: usize,
    visited: usize,
    graph: LinkGraph,
    store: DocumentStore,
    report: CrawlReport,
}

impl CrawlState {
    /// Unknown URLs are implicitly Discovered
    fn state_of(&self, url: &str) -> PageState {
        self.pages
            .get(url)
            .copied()
            .unwrap_or(PageState::Discovered)
    }

    fn set_state(&mut self, url: &str, next: PageState) -> Result<()> {
        let current = self.state_of(url);
        current.transition(next)?;

        if current == PageState::Queued {
            self.queued -= 1;
        }
        match next {
            PageState::Queued => self.queued += 1,
            PageState::Visited => self.visited += 1,
            _ => {}
        }
        self.pages.insert(url.to_string(), next);
        Ok(())
    }

    fn has_budget(&self, max_pages: usize) -> bool {
        self.visited + self.queued < max_pages
    }

    /// Moves a Discovered URL to Queued if the budget allows
    ///
    /// Returns true when the caller must push the URL onto the frontier.
    /// Known URLs (queued, visited or rejected) are left alone.
    fn admit(&mut self, url: &str, max_pages: usize) -> bool {
        if self.state_of(url) != PageState::Discovered {
            return false;
        }
        if !self.has_budget(max_pages) {
            self.reject(url, RejectReason::Budget);
            return false;
        }
        self.set_state(url, PageState::Queued).is_ok()
    }

    fn reject(&mut self, url: &str, reason: RejectReason) {
        if let Err(e) = self.set_state(url, PageState::Rejected) {
            tracing::debug!("Not rejecting {}: {}", url, e);
            return;
        }
        match reason {
            RejectReason::Robots => self.report.rejected_robots += 1,
            RejectReason::Normalization => self.report.rejected_normalization += 1,
            RejectReason::Budget => self.report.rejected_budget += 1,
        }
        tracing::debug!("Rejected {} ({})", url, reason);
    }
}

/// One crawl invocation: configuration, shared state and worker pool
pub struct CrawlSession {
    client: Client,
    robots: RobotsGatekeeper,
    frontier: Frontier,
    state: Mutex<CrawlState>,
    max_pages: usize,
    request_delay: Duration,
    workers: usize,
}

impl CrawlSession {
    /// Creates a session with empty state
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let robots = RobotsGatekeeper::new(client.clone(), config.user_agent.crawler_name.clone());

        Ok(Self {
            client,
            robots,
            frontier: Frontier::new(),
            state: Mutex::new(CrawlState::default()),
            max_pages: config.crawler.max_pages,
            request_delay: config.crawler.request_delay(),
            workers: config.crawler.workers.max(1),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state of a URL within this session
    pub fn page_state(&self, url: &str) -> PageState {
        self.lock_state().state_of(url)
    }

    /// Runs the crawl to completion
    ///
    /// Seeds are normalized and admitted under the page budget, the worker
    /// pool drains the frontier, then every worker receives one stop
    /// sentinel and is joined. Per-URL failures never abort the crawl, and
    /// a panicked worker is logged and counted while whatever the session
    /// collected is still returned.
    pub async fn run(self: Arc<Self>, seeds: &[String]) -> CrawlResult {
        let started = Instant::now();
        self.admit_seeds(seeds);

        tracing::info!(
            "Starting crawl with {} workers, budget {} pages, {} seed(s) queued",
            self.workers,
            self.max_pages,
            self.frontier.len()
        );

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let session = Arc::clone(&self);
                tokio::spawn(async move { session.worker(id).await })
            })
            .collect();

        self.frontier.join().await;
        tracing::debug!("Frontier drained, stopping {} workers", handles.len());

        for _ in 0..handles.len() {
            self.frontier.push(FrontierItem::Stop);
        }
        let failed_workers = join_workers(handles).await;

        let mut state = std::mem::take(&mut *self.lock_state());
        state.report.failed_workers = failed_workers;
        state.report.pages_stored = state.store.len();
        state.report.visited = state.visited;
        state.report.graph_nodes = state.graph.node_count();
        state.report.graph_edges = state.graph.edge_count();
        state.report.elapsed = started.elapsed();

        tracing::info!(
            "Crawl finished: {} pages stored, {} visited, {} rejected in {:?}",
            state.report.pages_stored,
            state.report.visited,
            state.report.rejected(),
            state.report.elapsed
        );

        CrawlResult {
            pages: state.store,
            graph: state.graph,
            report: state.report,
        }
    }

    fn admit_seeds(&self, seeds: &[String]) {
        let mut state = self.lock_state();
        for seed in seeds {
            match normalize_url(seed, None) {
                Ok(url) => {
                    if state.admit(url.as_str(), self.max_pages) {
                        self.frontier.push(FrontierItem::Url(url));
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping seed {}: {}", seed, e);
                    state.reject(seed, RejectReason::Normalization);
                }
            }
        }
    }

    async fn worker(&self, id: usize) {
        tracing::trace!("Worker {} started", id);
        loop {
            let item = self.frontier.pop().await;
            let _done = TaskGuard::new(&self.frontier);
            match item {
                FrontierItem::Stop => break,
                FrontierItem::Url(url) => self.process_url(url).await,
            }
        }
        tracing::trace!("Worker {} stopped", id);
    }

    /// Processes a single dequeued URL
    ///
    /// This method:
    /// 1. Re-normalizes the URL and skips anything no longer Queued
    /// 2. Checks robots.txt
    /// 3. Fetches and extracts the page
    /// 4. Records the outcome under the state lock
    /// 5. Sleeps for the politeness delay
    async fn process_url(&self, queued: Url) {
        let url = match normalize_url(queued.as_str(), None) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Dropping {}: {}", queued, e);
                self.lock_state()
                    .reject(queued.as_str(), RejectReason::Normalization);
                return;
            }
        };

        let current = self.page_state(url.as_str());
        if current != PageState::Queued {
            tracing::debug!("Skipping {} ({})", url, current);
            return;
        }

        if !self.robots.is_allowed(&url).await {
            tracing::info!("URL {} disallowed by robots.txt", url);
            self.lock_state().reject(url.as_str(), RejectReason::Robots);
            return;
        }

        match fetch_document(&self.client, &url).await {
            Ok(page) => self.record_page(&url, page),
            Err(e) => self.record_failure(&url, &e),
        }

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }

    fn record_page(&self, url: &Url, page: ExtractedPage) {
        let key = url.as_str();
        let mut state = self.lock_state();

        if let Err(e) = state.set_state(key, PageState::Visited) {
            tracing::warn!("Not recording {}: {}", key, e);
            return;
        }
        state.store.insert(page.document);
        state.graph.add_node(key);

        for link in page.links {
            state.graph.add_edge(key, link.as_str());
            if state.admit(link.as_str(), self.max_pages) {
                self.frontier.push(FrontierItem::Url(link));
            }
        }

        tracing::info!("Crawled ({}): {}", state.store.len(), key);
    }

    fn record_failure(&self, url: &Url, error: &SearchError) {
        let mut state = self.lock_state();
        match state.set_state(url.as_str(), PageState::Visited) {
            Ok(()) => {
                state.report.fetch_failures += 1;
                tracing::debug!("Fetch failed for {}: {}", url, error);
            }
            Err(e) => tracing::warn!("Not recording failure of {}: {}", url, e),
        }
    }
}

/// Awaits every worker, returning how many of them panicked
async fn join_workers(handles: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for (id, handle) in handles.into_iter().enumerate() {
        if let Err(e) = handle.await {
            tracing::error!("Worker {} failed: {}", id, e);
            failed += 1;
        }
    }
    failed
}
