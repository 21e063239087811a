//! Fetch-and-extract pipeline for a single page

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{parse_html, ParsedPage};
use crate::storage::Document;
use crate::text::{detect_language, normalize_for, Language};
use crate::{Result, SearchError};
use reqwest::Client;
use url::Url;

/// Text nodes fed to the language classifier
const LANGUAGE_SAMPLE_NODES: usize = 500;

/// A fetched page ready to be recorded
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub document: Document,
    pub links: Vec<Url>,
    pub language: Language,
}

/// Builds the stored document from a parsed page
///
/// The title falls back to the URL. Language is classified from the title
/// plus the first 500 text nodes; the full text is normalized with the
/// matching normalizer.
pub fn extract_page(url: &Url, parsed: ParsedPage) -> ExtractedPage {
    let title = parsed.title.clone().unwrap_or_else(|| url.to_string());
    let sample = format!("{} {}", title, parsed.text_prefix(LANGUAGE_SAMPLE_NODES));
    let language = detect_language(&sample);
    let text = normalize_for(language, &parsed.full_text());

    ExtractedPage {
        document: Document::new(url.as_str(), title, text),
        links: parsed.links,
        language,
    }
}

/// Fetches `url` and extracts its document and outbound links
///
/// # Errors
///
/// Every failure here is per-URL and non-fatal to a crawl:
/// `HttpStatus`, `NonHtml`, `Timeout`, `Network`, and `HtmlParse` when
/// the body cannot be decoded.
pub async fn fetch_document(client: &Client, url: &Url) -> Result<ExtractedPage> {
    match fetch_url(client, url.as_str()).await {
        FetchResult::Success { body } => Ok(extract_page(url, parse_html(&body, url))),
        FetchResult::ContentMismatch { content_type } => Err(SearchError::NonHtml {
            url: url.to_string(),
            content_type,
        }),
        FetchResult::HttpError { status_code } => Err(SearchError::HttpStatus {
            url: url.to_string(),
            status: status_code,
        }),
        FetchResult::NetworkError { timed_out: true, .. } => Err(SearchError::Timeout {
            url: url.to_string(),
        }),
        FetchResult::NetworkError { error, .. } => Err(SearchError::Network {
            url: url.to_string(),
            message: error,
        }),
        FetchResult::UnreadableBody { error } => Err(SearchError::HtmlParse {
            url: url.to_string(),
            message: error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_page_title_fallback() {
        let url = Url::parse("https://example.com/untitled").unwrap();
        let parsed = parse_html("<html><body><p>Hello there</p></body></html>", &url);
        let page = extract_page(&url, parsed);

        assert_eq!(page.document.title, "https://example.com/untitled");
        assert_eq!(page.document.url, "https://example.com/untitled");
    }

    #[test]
    fn test_extract_page_normalizes_english() {
        let url = Url::parse("https://example.com/").unwrap();
        let html = "<html><head><title>Cats!</title></head><body><p>Cats &amp; DOGS, 42.</p></body></html>";
        let page = extract_page(&url, parse_html(html, &url));

        assert_eq!(page.document.title, "Cats!");
        assert_eq!(page.document.text, "cats cats dogs 42");
    }

    #[test]
    fn test_extract_page_keeps_mongolian_cyrillic() {
        let url = Url::parse("https://mn.example.org/wiki").unwrap();
        let html = "<html><head><title>Монгол Улс</title></head>\
                    <body><p>Монгол Улс нь Зүүн Хойд Азид оршдог. Нийслэл нь Улаанбаатар хот бөгөөд \
                    хүн амын тал нь тэнд амьдардаг.</p></body></html>";
        let page = extract_page(&url, parse_html(html, &url));

        assert!(page.language.is_mongolian());
        assert!(page.document.text.starts_with("монгол улс монгол улс нь зүүн хойд"));
    }
}
