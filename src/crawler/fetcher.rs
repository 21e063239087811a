//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for crawled pages:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - GET requests with status and Content-Type checks
//! - Classifying failures (HTTP status, non-HTML, network, timeout)

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

/// Content types accepted as HTML
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received, empty when absent
        content_type: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Headers arrived but the body could not be read or decoded
    UnreadableBody {
        /// Error description
        error: String,
    },

    /// Network error (connection refused, timeout)
    NetworkError {
        /// Error description
        error: String,
        /// True when the request hit the configured timeout
        timed_out: bool,
    },
}

/// Formats the user agent string sent with every request
///
/// # Example
///
/// ```
/// use linkrank::config::UserAgentConfig;
/// use linkrank::crawler::user_agent_string;
///
/// let ua = user_agent_string(&UserAgentConfig::default());
/// assert_eq!(ua, "Mozilla/5.0 (compatible; GenericCrawler/1.0)");
/// ```
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!(
            "Mozilla/5.0 (compatible; {}/{})",
            config.crawler_name, config.crawler_version
        ),
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Supplies the per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(crawler.fetch_timeout())
        .connect_timeout(crawler.fetch_timeout().min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type header value denotes HTML
pub fn is_html_content_type(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    HTML_CONTENT_TYPES.iter().any(|t| lowered.contains(t))
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | status != 200 | `HttpError` |
/// | Content-Type not HTML | `ContentMismatch` |
/// | Timeout | `NetworkError { timed_out: true }` |
/// | Connection error | `NetworkError` |
/// | Body read/decode error | `UnreadableBody` |
///
/// Redirects are followed by the client; the final URL is reported but the
/// caller keys the page by the URL it asked for.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return network_error(e),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { body },
        Err(e) if e.is_timeout() => network_error(e),
        Err(e) => FetchResult::UnreadableBody {
            error: e.to_string(),
        },
    }
}

fn network_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}
