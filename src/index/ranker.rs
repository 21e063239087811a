//! Score fusion: term match blended with link authority
//!
//! A query is scored in two passes over the document store:
//! 1. cosine similarity of term counts (strictly positive scores only)
//! 2. a literal substring check on the stored text, worth 1.0 for
//!    documents the first pass missed
//!
//! The union is blended with min-max normalized PageRank. When nothing
//! matches at all, documents are returned in PageRank order instead.

use crate::config::RankingConfig;
use crate::index::pagerank::PageRankScores;
use crate::index::snippet::make_snippet;
use crate::index::vectorizer::TermMatrix;
use crate::storage::{Document, DocumentStore};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One ranked query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub url: String,
    pub title: String,
    pub score: f64,
    pub snippet: String,
}

/// Knobs for a single ranking pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    pub top_k: usize,
    pub blend_alpha: f64,
    pub snippet_length: usize,
}

impl From<&RankingConfig> for RankOptions {
    fn from(config: &RankingConfig) -> Self {
        Self {
            top_k: config.top_k,
            blend_alpha: config.blend_alpha,
            snippet_length: config.snippet_length,
        }
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self::from(&RankingConfig::default())
    }
}

/// Min-max normalizes `values` into [0, 1]
///
/// If every value is equal the result is all 1.0.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|&v| if range > 0.0 { (v - min) / range } else { 1.0 })
        .collect()
}

/// Normalized PageRank keyed by URL
fn normalized_pagerank(pagerank: &PageRankScores) -> HashMap<&str, f64> {
    pagerank
        .nodes()
        .iter()
        .map(String::as_str)
        .zip(min_max_normalize(pagerank.ranks()))
        .collect()
}

fn by_score_desc(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal)
}

fn to_result(doc: &Document, score: f64, query: &str, options: &RankOptions) -> RankedResult {
    RankedResult {
        url: doc.url.clone(),
        title: doc.display_title().to_string(),
        score,
        snippet: make_snippet(&doc.text, query, options.snippet_length),
    }
}

/// Ranks the documents of `store` against `query`
///
/// `matrix` rows must line up with `store` order. The query is trimmed;
/// an empty query or a missing matrix yields no results. Sorting is
/// stable, so equal scores keep store order (graph order on the fallback
/// path). Scores are returned unrounded.
pub fn rank(
    query: &str,
    store: &DocumentStore,
    matrix: Option<&TermMatrix>,
    pagerank: &PageRankScores,
    options: &RankOptions,
) -> Vec<RankedResult> {
    let query = query.trim();
    let Some(matrix) = matrix else {
        return Vec::new();
    };
    if query.is_empty() || options.top_k == 0 {
        return Vec::new();
    }

    let docs = store.documents();
    let mut matched = vec![false; docs.len()];
    let mut scored: Vec<(usize, f64)> = Vec::new();

    for (row, similarity) in matrix.similarities(query).into_iter().enumerate().take(docs.len()) {
        if similarity > 0.0 {
            matched[row] = true;
            scored.push((row, similarity));
        }
    }

    for (row, doc) in docs.iter().enumerate() {
        if !matched[row] && doc.text.contains(query) {
            matched[row] = true;
            scored.push((row, 1.0));
        }
    }

    let normalized = normalized_pagerank(pagerank);

    if scored.is_empty() {
        if normalized.is_empty() {
            return Vec::new();
        }
        return fallback(query, store, pagerank, &normalized, options);
    }

    let alpha = options.blend_alpha;
    for entry in &mut scored {
        let authority = normalized
            .get(docs[entry.0].url.as_str())
            .copied()
            .unwrap_or(0.0);
        entry.1 = alpha * entry.1 + (1.0 - alpha) * authority;
    }

    scored.sort_by(by_score_desc);
    scored
        .into_iter()
        .take(options.top_k)
        .map(|(row, score)| to_result(&docs[row], score, query, options))
        .collect()
}

/// Documents ordered purely by normalized PageRank
///
/// Candidates are taken in graph order, then any stored documents the
/// graph does not know about (score 0.0).
fn fallback(
    query: &str,
    store: &DocumentStore,
    pagerank: &PageRankScores,
    normalized: &HashMap<&str, f64>,
    options: &RankOptions,
) -> Vec<RankedResult> {
    let mut candidates: Vec<(usize, f64)> = pagerank
        .nodes()
        .iter()
        .filter_map(|url| {
            let row = store.position(url)?;
            Some((row, normalized.get(url.as_str()).copied().unwrap_or(0.0)))
        })
        .collect();

    let docs = store.documents();
    for (row, doc) in docs.iter().enumerate() {
        if pagerank.get(&doc.url).is_none() {
            candidates.push((row, 0.0));
        }
    }

    candidates.sort_by(by_score_desc);
    candidates
        .into_iter()
        .take(options.top_k)
        .map(|(row, score)| to_result(&docs[row], score, query, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::pagerank::compute_pagerank;
    use crate::storage::LinkGraph;

    fn store(docs: &[(&str, &str)]) -> DocumentStore {
        let mut store = DocumentStore::new();
        for (url, text) in docs {
            store.insert(Document::new(*url, "", *text));
        }
        store
    }

    fn matrix_for(store: &DocumentStore) -> Option<TermMatrix> {
        let corpus: Vec<String> = store.iter().map(|d| d.text.clone()).collect();
        TermMatrix::build(&corpus)
    }

    fn options(top_k: usize, blend_alpha: f64) -> RankOptions {
        RankOptions {
            top_k,
            blend_alpha,
            snippet_length: 200,
        }
    }

    #[test]
    fn test_min_max_normalize() {
        assert_eq!(min_max_normalize(&[1.0, 3.0, 2.0]), vec![0.0, 1.0, 0.5]);
        assert_eq!(min_max_normalize(&[0.2, 0.2]), vec![1.0, 1.0]);
        assert!(min_max_normalize(&[]).is_empty());
    }

    #[test]
    fn test_empty_query_and_missing_matrix() {
        let s = store(&[("http://a.com/", "cat dog")]);
        let m = matrix_for(&s);
        let pr = PageRankScores::default();

        assert!(rank("", &s, m.as_ref(), &pr, &options(20, 0.85)).is_empty());
        assert!(rank("   ", &s, m.as_ref(), &pr, &options(20, 0.85)).is_empty());
        assert!(rank("cat", &s, None, &pr, &options(20, 0.85)).is_empty());
    }

    #[test]
    fn test_cat_dog_scenario() {
        let s = store(&[("http://a.com/", "cat dog"), ("http://b.com/", "dog dog dog")]);
        let m = matrix_for(&s);
        let results = rank("dog", &s, m.as_ref(), &PageRankScores::default(), &options(20, 0.85));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "http://b.com/");
        assert!(results[1].score > 0.0);
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_substring_match_scores_one() {
        // "og d" never tokenizes but is a literal substring of the text
        let s = store(&[("http://a.com/", "dog day"), ("http://b.com/", "cat")]);
        let m = matrix_for(&s);
        let results = rank("og d", &s, m.as_ref(), &PageRankScores::default(), &options(20, 1.0));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "http://a.com/");
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_alpha_one_ignores_pagerank() {
        let s = store(&[("http://a.com/", "cat dog"), ("http://b.com/", "dog dog dog")]);
        let m = matrix_for(&s).unwrap();
        let mut graph = LinkGraph::new();
        graph.add_edge("http://b.com/", "http://a.com/");
        let pr = compute_pagerank(&graph, 0.85, 100, 1e-6);

        let q = m.query_vector("dog");
        let results = rank("dog", &s, Some(&m), &pr, &options(20, 1.0));
        let a = results.iter().find(|r| r.url == "http://a.com/").unwrap();
        assert_eq!(a.score, m.cosine(0, &q));
    }

    #[test]
    fn test_alpha_zero_orders_by_pagerank() {
        let s = store(&[("http://a.com/", "dog"), ("http://b.com/", "dog dog")]);
        let m = matrix_for(&s);
        let mut graph = LinkGraph::new();
        graph.add_edge("http://b.com/", "http://a.com/");
        let pr = compute_pagerank(&graph, 0.85, 100, 1e-6);

        let results = rank("dog", &s, m.as_ref(), &pr, &options(20, 0.0));
        assert_eq!(results[0].url, "http://a.com/");
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[1].score, 0.0);
    }

    #[test]
    fn test_fallback_orders_by_pagerank() {
        let s = store(&[
            ("http://a.com/", "alpha"),
            ("http://b.com/", "beta"),
            ("http://c.com/", "gamma"),
        ]);
        let m = matrix_for(&s);
        let mut graph = LinkGraph::new();
        graph.add_edge("http://a.com/", "http://c.com/");
        graph.add_edge("http://b.com/", "http://c.com/");
        graph.add_edge("http://c.com/", "http://outside.com/");
        let pr = compute_pagerank(&graph, 0.85, 100, 1e-6);

        let results = rank("zebra", &s, m.as_ref(), &pr, &options(2, 0.85));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "http://c.com/");
        assert!(results[0].score >= results[1].score);
        assert!(results.iter().all(|r| r.url != "http://outside.com/"));
    }

    #[test]
    fn test_no_match_and_no_pagerank_is_empty() {
        let s = store(&[("http://a.com/", "alpha")]);
        let m = matrix_for(&s);
        assert!(rank("zebra", &s, m.as_ref(), &PageRankScores::default(), &options(20, 0.85)).is_empty());
    }

    #[test]
    fn test_top_k_caps_results() {
        let s = store(&[
            ("http://a.com/", "dog"),
            ("http://b.com/", "dog"),
            ("http://c.com/", "dog"),
        ]);
        let m = matrix_for(&s);
        let results = rank("dog", &s, m.as_ref(), &PageRankScores::default(), &options(2, 0.85));
        assert_eq!(results.len(), 2);
        // equal scores keep store order
        assert_eq!(results[0].url, "http://a.com/");
        assert_eq!(results[1].url, "http://b.com/");
    }

    #[test]
    fn test_results_carry_title_and_snippet() {
        let mut s = DocumentStore::new();
        s.insert(Document::new("http://a.com/", "A Page", "intro then dog appears"));
        s.insert(Document::new("http://b.com/", "", "dog"));
        let m = matrix_for(&s);
        let results = rank("dog", &s, m.as_ref(), &PageRankScores::default(), &options(20, 0.85));

        let a = results.iter().find(|r| r.url == "http://a.com/").unwrap();
        assert_eq!(a.title, "A Page");
        assert_eq!(a.snippet, "<mark>dog</mark> appears");
        let b = results.iter().find(|r| r.url == "http://b.com/").unwrap();
        assert_eq!(b.title, "http://b.com/");
    }
}
