use lazy_static::lazy_static;
use regex::Regex;
use whatlang::{Lang, Script};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").expect("valid regex");
}

/// Number of word tokens sampled for detection
const SAMPLE_TOKENS: usize = 200;

/// Cyrillic letters used by Mongolian but not by Russian
const MONGOLIAN_LETTERS: &[char] = &['Ө', 'ө', 'Ү', 'ү', 'Ң', 'ң'];

/// Outcome of language classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Mongolian,
    /// Any language the statistical detector recognized
    Detected(Lang),
    /// Empty input or no confident verdict
    Unknown,
}

impl Language {
    pub fn is_mongolian(&self) -> bool {
        matches!(self, Self::Mongolian)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Mongolian => "mn",
            Self::Detected(lang) => lang.code(),
            Self::Unknown => "unknown",
        }
    }
}

/// True if the text contains Mongolian-specific Cyrillic letters or any
/// code point from the Mongolian script block (U+1800..=U+18AF)
pub fn contains_mongolian_hint(text: &str) -> bool {
    text.chars()
        .any(|c| MONGOLIAN_LETTERS.contains(&c) || ('\u{1800}'..='\u{18AF}').contains(&c))
}

/// First stage: statistical detection over a token sample
///
/// The detector has no Mongolian model, so Mongolian Cyrillic text comes
/// back as some other Cyrillic language; [`detect_language`] corrects that.
pub fn detect_statistical(sample: &str) -> Language {
    match whatlang::detect(sample) {
        Some(info) if info.is_reliable() => Language::Detected(info.lang()),
        _ => Language::Unknown,
    }
}

/// Second stage: override ambiguous or Cyrillic verdicts to Mongolian when
/// the sample carries a Mongolian hint
pub fn apply_mongolian_override(detected: Language, sample: &str) -> Language {
    let ambiguous = match detected {
        Language::Unknown => true,
        Language::Detected(Lang::Rus) => true,
        Language::Detected(lang) => lang_script(lang) == Some(Script::Cyrillic),
        Language::Mongolian => return Language::Mongolian,
    };

    if ambiguous && contains_mongolian_hint(sample) {
        Language::Mongolian
    } else {
        detected
    }
}

/// Classifies text; empty or token-free input is `Unknown`
pub fn detect_language(text: &str) -> Language {
    let tokens: Vec<&str> = WORD
        .find_iter(text)
        .take(SAMPLE_TOKENS)
        .map(|m| m.as_str())
        .collect();
    if tokens.is_empty() {
        return Language::Unknown;
    }

    let sample = tokens.join(" ");
    apply_mongolian_override(detect_statistical(&sample), &sample)
}

fn lang_script(lang: Lang) -> Option<Script> {
    match lang {
        Lang::Rus | Lang::Ukr | Lang::Bel | Lang::Bul | Lang::Srp | Lang::Mkd => {
            Some(Script::Cyrillic)
        }
        _ => None,
    }
}
