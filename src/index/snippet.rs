//! Result snippets and page previews

/// Characters shown by [`preview`] before truncation
pub const PREVIEW_LENGTH: usize = 250;

/// Snippet window size used when none is configured
pub const DEFAULT_SNIPPET_LENGTH: usize = 200;

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Char offset of the first case-insensitive occurrence of `needle`
fn find_folded(haystack: &str, needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().map(fold).collect();
    if needle.is_empty() {
        return None;
    }
    let hay: Vec<char> = haystack.chars().map(fold).collect();
    hay.windows(needle.len())
        .position(|window| window == needle.as_slice())
}

/// Builds a snippet of `len` characters around the query
///
/// The window starts at the first case-insensitive occurrence of `query`
/// in `text` (or at the start when there is none). Literal occurrences of
/// `query` inside the window are wrapped in `<mark>` tags.
pub fn make_snippet(text: &str, query: &str, len: usize) -> String {
    let start = find_folded(text, query).unwrap_or(0);
    let window: String = text.chars().skip(start).take(len).collect();

    if query.is_empty() {
        window
    } else {
        window.replace(query, &format!("<mark>{}</mark>", query))
    }
}

/// First 250 characters of `text`, with `...` appended when truncated
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_LENGTH).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_starts_at_match() {
        let text = "alpha beta gamma delta";
        assert_eq!(make_snippet(text, "gamma", 11), "<mark>gamma</mark> delta");
    }

    #[test]
    fn test_snippet_case_insensitive_start() {
        // The window starts at the match but only the literal query is marked
        let text = "intro Rust is fun";
        assert_eq!(make_snippet(text, "rust", 7), "Rust is");
    }

    #[test]
    fn test_snippet_without_match_starts_at_beginning() {
        assert_eq!(make_snippet("one two three", "zzz", 3), "one");
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let text = "өнөөдөр монгол улс";
        assert_eq!(make_snippet(text, "монгол", 6), "<mark>монгол</mark>");
    }

    #[test]
    fn test_snippet_empty_query() {
        assert_eq!(make_snippet("abcdef", "", 3), "abc");
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(300);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_LENGTH + 3);
        assert!(p.ends_with("..."));

        assert_eq!(preview("short"), "short");
        assert_eq!(preview(&"y".repeat(250)), "y".repeat(250));
    }
}
