use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Anything outside Latin lowercase, digits, the Cyrillic blocks and the Mongolian script
    static ref MN_STRIP: Regex =
        Regex::new(r"[^a-z0-9\x{0400}-\x{052F}\x{2DE0}-\x{2DFF}\x{A640}-\x{A69F}\x{1800}-\x{18AF}\s]")
            .expect("valid regex");
    static ref EN_STRIP: Regex = Regex::new(r"[^a-z0-9\s]").expect("valid regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Normalizes Mongolian text for storage and indexing
///
/// NFKC, lowercase, replace every character outside the Mongolian/Cyrillic
/// and ASCII alphanumeric classes with a space, collapse whitespace.
pub fn mn_preprocess(text: &str) -> String {
    filter_with(&MN_STRIP, text)
}

/// Normalizes English (and any non-Mongolian) text
///
/// Same pipeline as [`mn_preprocess`] but keeps only `[a-z0-9]`.
pub fn en_preprocess(text: &str) -> String {
    filter_with(&EN_STRIP, text)
}

fn filter_with(strip: &Regex, text: &str) -> String {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    let stripped = strip.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_en_preprocess() {
        assert_eq!(
            en_preprocess("  Hello, World!\n\tRust-2021 édition "),
            "hello world rust 2021 dition"
        );
    }

    #[test]
    fn test_en_preprocess_drops_cyrillic() {
        assert_eq!(en_preprocess("Монгол Ulsiin"), "ulsiin");
    }

    #[test]
    fn test_mn_preprocess_keeps_cyrillic_and_mongolian_script() {
        assert_eq!(
            mn_preprocess("Өвөрхангай аймаг, ᠮᠣᠩᠭᠣᠯ (2024)!"),
            "өвөрхангай аймаг ᠮᠣᠩᠭᠣᠯ 2024"
        );
    }

    #[test]
    fn test_nfkc_applied() {
        // Fullwidth letters fold to ASCII before filtering
        assert_eq!(en_preprocess("ＡＢＣ１２３"), "abc123");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(mn_preprocess(""), "");
        assert_eq!(en_preprocess("!!! ???"), "");
    }
}
