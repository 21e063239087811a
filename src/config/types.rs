use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Linkrank
///
/// Every section and every field is optional; missing values fall back to
/// the defaults below so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URLs the frontier starts from
    #[serde(default = "default_seeds")]
    pub seeds: Vec<String>,

    /// Upper bound on visited + queued URLs for one crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Pause each worker takes after every fetch attempt (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Number of concurrent worker tasks
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seeds: default_seeds(),
            max_pages: default_max_pages(),
            request_delay_ms: default_request_delay_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            workers: default_workers(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also used as the robots.txt product token
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Ranking and index configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    /// PageRank damping factor
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Weight of the term-match score against normalized PageRank
    #[serde(rename = "blend-alpha", default = "default_blend_alpha")]
    pub blend_alpha: f64,

    /// Maximum number of results returned per query
    #[serde(rename = "top-k", default = "default_top_k")]
    pub top_k: usize,

    #[serde(rename = "max-iterations", default = "default_max_iterations")]
    pub max_iterations: usize,

    /// L1 convergence threshold for PageRank
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Snippet window size in characters
    #[serde(rename = "snippet-length", default = "default_snippet_length")]
    pub snippet_length: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            blend_alpha: default_blend_alpha(),
            top_k: default_top_k(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            snippet_length: default_snippet_length(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the persisted document store
    #[serde(rename = "pages-path", default = "default_pages_path")]
    pub pages_path: PathBuf,

    /// Path to the persisted link graph
    #[serde(rename = "graph-path", default = "default_graph_path")]
    pub graph_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pages_path: default_pages_path(),
            graph_path: default_graph_path(),
        }
    }
}

fn default_seeds() -> Vec<String> {
    vec!["https://mn.wikipedia.org/wiki/Нэвтэрхий_толь".to_string()]
}

fn default_max_pages() -> usize {
    500
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_fetch_timeout_secs() -> u64 {
    5
}

fn default_workers() -> usize {
    10
}

fn default_crawler_name() -> String {
    "GenericCrawler".to_string()
}

fn default_crawler_version() -> String {
    "1.0".to_string()
}

fn default_damping() -> f64 {
    0.85
}

fn default_blend_alpha() -> f64 {
    0.85
}

fn default_top_k() -> usize {
    20
}

fn default_max_iterations() -> usize {
    100
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_snippet_length() -> usize {
    200
}

fn default_pages_path() -> PathBuf {
    PathBuf::from("pages.json")
}

fn default_graph_path() -> PathBuf {
    PathBuf::from("graph.json")
}
