use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkrank::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the origin of a URL as `scheme://host[:port]`
///
/// Default ports are omitted. This is the key of the robots.txt cache.
///
/// ```
/// use url::Url;
/// use linkrank::url::origin_of;
///
/// let url = Url::parse("http://127.0.0.1:8080/a/b").unwrap();
/// assert_eq!(origin_of(&url), "http://127.0.0.1:8080");
/// ```
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}
