//! Robots.txt parser implementation
//!
//! Thin wrapper over the robotstxt crate. Only allow/disallow rules are
//! consulted; `Crawl-delay` and `Sitemap` lines are ignored.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt policy for one origin
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt body; matching is done on demand
    content: String,
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a policy from a raw robots.txt body
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// Cached whenever robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Returns true when the policy permits everything without matching
    pub fn is_permissive(&self) -> bool {
        self.allow_all || self.content.trim().is_empty()
    }

    /// Checks if a URL is allowed for the given product token
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL or path to check (e.g., "/page.html")
    /// * `user_agent` - The crawler's product token, e.g. "GenericCrawler"
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_permissive() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
