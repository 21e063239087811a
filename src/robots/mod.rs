//! Robots.txt handling module
//!
//! This module fetches, parses, and caches robots.txt per origin and answers
//! allow/deny questions for the crawler. Fetch failures are fail-open: an
//! origin whose robots.txt cannot be retrieved is treated as allowing
//! everything.

mod parser;

pub use parser::ParsedRobots;

use crate::url::origin_of;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use url::Url;

/// Fetches robots.txt for an origin
///
/// Any network error or non-success status yields a permissive policy.
///
/// # Arguments
///
/// * `client` - The HTTP client carrying the crawler's user agent
/// * `origin` - `scheme://host[:port]` of the site
pub async fn fetch_robots(client: &Client, origin: &str) -> ParsedRobots {
    let robots_url = format!("{}/robots.txt", origin);

    let response = match client.get(&robots_url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt unreachable at {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if response.status() != StatusCode::OK {
        tracing::debug!(
            "robots.txt at {} returned {}, allowing all",
            robots_url,
            response.status()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::debug!("Failed to read robots.txt body at {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}

/// How long a fetched policy is trusted before the origin is asked again
const POLICY_TTL_HOURS: i64 = 24;

#[derive(Debug)]
struct PolicyEntry {
    policy: ParsedRobots,
    fetched_at: DateTime<Utc>,
}

impl PolicyEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.fetched_at <= Duration::hours(POLICY_TTL_HOURS)
    }
}

/// Per-origin robots.txt cache shared by all crawl workers
///
/// Concurrent misses for the same origin may both fetch; the last insert
/// wins. The lock is never held across a network call.
#[derive(Debug)]
pub struct RobotsGatekeeper {
    client: Client,
    product_token: String,
    cache: RwLock<HashMap<String, PolicyEntry>>,
}

impl RobotsGatekeeper {
    /// Creates a gatekeeper
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for robots.txt requests
    /// * `product_token` - Name matched against `User-agent:` lines
    pub fn new(client: Client, product_token: impl Into<String>) -> Self {
        Self {
            client,
            product_token: product_token.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns true if robots.txt of the URL's origin permits fetching it
    pub async fn is_allowed(&self, url: &Url) -> bool {
        let origin = origin_of(url);

        if let Some(allowed) = self.check_cached(&origin, url) {
            return allowed;
        }

        let policy = fetch_robots(&self.client, &origin).await;
        let allowed = policy.is_allowed(url.as_str(), &self.product_token);

        self.cache.write().unwrap_or_else(PoisonError::into_inner).insert(
            origin,
            PolicyEntry {
                policy,
                fetched_at: Utc::now(),
            },
        );

        allowed
    }

    fn check_cached(&self, origin: &str, url: &Url) -> Option<bool> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(origin)
            .filter(|entry| entry.is_fresh(Utc::now()))
            .map(|entry| entry.policy.is_allowed(url.as_str(), &self.product_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_disallow_is_respected_and_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gatekeeper = RobotsGatekeeper::new(Client::new(), "TestBot");
        let admin = Url::parse(&format!("{}/admin/panel", server.uri())).unwrap();
        let page = Url::parse(&format!("{}/page", server.uri())).unwrap();

        assert!(!gatekeeper.is_allowed(&admin).await);
        assert!(gatekeeper.is_allowed(&page).await);
        assert_eq!(gatekeeper.cache.read().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_policy_is_refetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
            .expect(1)
            .mount(&server)
            .await;

        let gatekeeper = RobotsGatekeeper::new(Client::new(), "TestBot");
        let page = Url::parse(&format!("{}/page", server.uri())).unwrap();
        // A stale deny-all entry must not be trusted
        gatekeeper.cache.write().unwrap().insert(
            origin_of(&page),
            PolicyEntry {
                policy: ParsedRobots::from_content("User-agent: *\nDisallow: /"),
                fetched_at: Utc::now() - Duration::hours(POLICY_TTL_HOURS + 1),
            },
        );

        assert!(gatekeeper.is_allowed(&page).await);
    }

    #[test]
    fn test_policy_freshness_window() {
        let now = Utc::now();
        let entry = PolicyEntry {
            policy: ParsedRobots::allow_all(),
            fetched_at: now - Duration::hours(23),
        };
        assert!(entry.is_fresh(now));
        assert!(!entry.is_fresh(now + Duration::hours(2)));
    }

    #[tokio::test]
    async fn test_missing_robots_fails_open() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let gatekeeper = RobotsGatekeeper::new(Client::new(), "TestBot");
        let url = Url::parse(&format!("{}/anything", server.uri())).unwrap();
        assert!(gatekeeper.is_allowed(&url).await);
    }

    #[tokio::test]
    async fn test_server_error_fails_open() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(500).set_body_string("User-agent: *\nDisallow: /"))
            .mount(&server)
            .await;

        let gatekeeper = RobotsGatekeeper::new(Client::new(), "TestBot");
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        assert!(gatekeeper.is_allowed(&url).await);
    }

    #[tokio::test]
    async fn test_unreachable_origin_fails_open() {
        let gatekeeper = RobotsGatekeeper::new(Client::new(), "TestBot");
        // Port 9 (discard) is not listening on the loopback interface in test environments
        let url = Url::parse("http://127.0.0.1:9/page").unwrap();
        assert!(gatekeeper.is_allowed(&url).await);
    }
}
