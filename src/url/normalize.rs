use crate::UrlError;
use url::Url;

/// Normalizes a URL into the canonical form used as the dedup key
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` when one is given; reject if malformed
/// 2. Accept only the `http` and `https` schemes
/// 3. Require a host
/// 4. Remove fragment (everything after #)
/// 5. Remove trailing slashes from the path, except for the root `/`
///
/// Host case and dot segments are already canonicalized by the parser.
/// Query strings are kept verbatim.
///
/// # Arguments
///
/// * `raw` - The URL or relative reference to normalize
/// * `base` - The page the reference was found on, if any
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The reference cannot be resolved to a crawlable URL
///
/// # Examples
///
/// ```
/// use linkrank::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.COM/page/#top", None).unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let parsed = match base {
        Some(base) => base.join(raw.trim()),
        None => Url::parse(raw.trim()),
    };
    let mut url = parsed.map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    let path = strip_trailing_slashes(url.path());
    if path.len() != url.path().len() {
        let path = path.to_string();
        url.set_path(&path);
    }

    Ok(url)
}

/// Drops trailing slashes unless the path is the root
fn strip_trailing_slashes(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/page/", None).unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_trailing_slash_equivalence() {
        let b = base("http://a.com/");
        assert_eq!(
            normalize_url("http://a.com/x/", Some(&b)).unwrap(),
            normalize_url("http://a.com/x", Some(&b)).unwrap()
        );
    }

    #[test]
    fn test_multiple_trailing_slashes() {
        let result = normalize_url("https://example.com/docs///", None).unwrap();
        assert_eq!(result.as_str(), "https://example.com/docs");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = normalize_url("https://example.com/", None).unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.com", None).unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("http://a.com/x#frag", None).unwrap();
        assert_eq!(result.as_str(), "http://a.com/x");
        assert!(result.fragment().is_none());
    }

    #[test]
    fn test_http_scheme_preserved() {
        let result = normalize_url("http://example.com/page", None).unwrap();
        assert_eq!(result.scheme(), "http");
    }

    #[test]
    fn test_query_kept() {
        let result = normalize_url("https://example.com/search?q=b&a=1", None).unwrap();
        assert_eq!(result.as_str(), "https://example.com/search?q=b&a=1");
    }

    #[test]
    fn test_relative_resolution() {
        let b = base("https://example.com/wiki/page");
        let result = normalize_url("../other/", Some(&b)).unwrap();
        assert_eq!(result.as_str(), "https://example.com/other");
    }

    #[test]
    fn test_fragment_only_reference_resolves_to_base() {
        let b = base("https://example.com/wiki/page");
        let result = normalize_url("#section", Some(&b)).unwrap();
        assert_eq!(result, b);
    }

    #[test]
    fn test_lowercase_domain() {
        let result = normalize_url("https://EXAMPLE.COM/Page", None).unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("mailto:someone@example.com", None);
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));

        let b = base("https://example.com/");
        let result = normalize_url("javascript:void(0)", Some(&b));
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url", None);
        assert!(matches!(result.unwrap_err(), UrlError::Parse(_)));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let result = normalize_url("  https://example.com/a  ", None).unwrap();
        assert_eq!(result.as_str(), "https://example.com/a");
    }
}
