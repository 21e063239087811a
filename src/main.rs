//! Linkrank main entry point
//!
//! This is the command-line interface for the Linkrank crawler and search
//! engine.

use anyhow::{Context, Result};
use clap::Parser;
use linkrank::config::{load_config, validate, Config};
use linkrank::crawler::{crawl, user_agent_string};
use linkrank::index::{evaluate, SearchIndex};
use linkrank::output::{
    print_crawl_report, print_page_list, print_results, print_statistics, CrawlStatistics,
};
use linkrank::storage::{DocumentStore, JsonStorage, LinkGraph, Storage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linkrank: crawl a small web neighbourhood and search it
///
/// Linkrank crawls from seed URLs while respecting robots.txt, records the
/// link graph, and ranks pages by blending term similarity with PageRank.
#[derive(Parser, Debug)]
#[command(name = "linkrank")]
#[command(version = "1.0.0")]
#[command(about = "A small crawl-and-rank search engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to crawl from; replaces configured seeds (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Override the page budget
    #[arg(long)]
    max_pages: Option<usize>,

    /// Override the worker count
    #[arg(long)]
    workers: Option<usize>,

    /// Override the per-request delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "list_pages", "query"])]
    dry_run: bool,

    /// Show statistics for the persisted pages and graph and exit
    #[arg(long, conflicts_with_all = ["dry_run", "list_pages", "query"])]
    stats: bool,

    /// List persisted pages with previews and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "query"])]
    list_pages: bool,

    /// Run a query against the persisted index and exit
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,

    /// Maximum number of results for --query
    #[arg(long, requires = "query")]
    top_k: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config);
    } else if cli.list_pages {
        handle_list_pages(&config);
    } else if let Some(query) = &cli.query {
        handle_query(&config, query, cli.top_k);
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkrank=info,warn"),
            1 => EnvFilter::new("linkrank=debug,info"),
            2 => EnvFilter::new("linkrank=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and
/// validates the result
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if !cli.seeds.is_empty() {
        config.crawler.seeds = cli.seeds.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.request_delay_ms = delay_ms;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Linkrank Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", user_agent_string(&config.user_agent));

    println!("\nRanking:");
    println!("  Damping: {}", config.ranking.damping);
    println!("  Blend alpha: {}", config.ranking.blend_alpha);
    println!("  Top k: {}", config.ranking.top_k);

    println!("\nOutput:");
    println!("  Pages: {}", config.output.pages_path.display());
    println!("  Graph: {}", config.output.graph_path.display());

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: summarizes the persisted crawl
fn handle_stats(config: &Config) {
    let storage = JsonStorage::new(&config.output.pages_path, &config.output.graph_path);
    let pages = storage.load_pages().unwrap_or_else(|e| {
        tracing::warn!("Could not load pages: {}", e);
        DocumentStore::new()
    });
    let graph = storage.load_graph().unwrap_or_else(|e| {
        tracing::warn!("Could not load graph: {}", e);
        LinkGraph::new()
    });

    println!("Pages: {}", storage.pages_path().display());
    println!("Graph: {}\n", storage.graph_path().display());
    print_statistics(&CrawlStatistics::collect(&pages, &graph));
}

/// Handles the --list-pages mode
fn handle_list_pages(config: &Config) {
    let index = SearchIndex::load(config);
    print_page_list(&index.previews());
}

/// Handles the --query mode: ranks, prints results and metrics
fn handle_query(config: &Config, query: &str, top_k: Option<usize>) {
    let index = SearchIndex::load(config);
    let results = index.rank(query, top_k.unwrap_or(config.ranking.top_k));

    let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    let metrics = evaluate(&urls);

    print_results(query.trim(), &results, &metrics);
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<()> {
    tracing::info!(
        "Crawling from {} seed(s), budget {} pages",
        config.crawler.seeds.len(),
        config.crawler.max_pages
    );

    let output = crawl(config).await.context("Crawl failed")?;
    print_crawl_report(&output.report);

    // Persisted files may be missing if saving failed; build from memory
    let index = SearchIndex::build(output.pages, &output.graph, &config.ranking);
    tracing::info!("Index ready with {} documents", index.len());

    Ok(())
}
