//! Language classification and text normalization
//!
//! Classification is two pure stages: a statistical detector, then a
//! Mongolian override for ambiguous Cyrillic verdicts. The verdict picks
//! the normalizer applied to stored and indexed text.

mod language;
mod preprocess;

pub use language::{
    apply_mongolian_override, contains_mongolian_hint, detect_language, detect_statistical,
    Language,
};
pub use preprocess::{en_preprocess, mn_preprocess};

/// Normalizes `text` with the normalizer matching `language`
pub fn normalize_for(language: Language, text: &str) -> String {
    if language.is_mongolian() {
        mn_preprocess(text)
    } else {
        en_preprocess(text)
    }
}

/// Detects the language of `text` itself and normalizes it accordingly
///
/// Used when rebuilding the index from persisted pages.
pub fn normalize_text(text: &str) -> String {
    normalize_for(detect_language(text), text)
}
