//! Term-count vectorizer
//!
//! Documents become sparse term-count rows over a lexicographically sorted
//! vocabulary. Similarity is plain cosine over raw counts (no IDF
//! weighting), so a document that repeats a query term more often relative
//! to its length scores higher.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w+\b").expect("valid regex");
}

/// Sparse count vector: `(term id, count)` pairs sorted by term id
pub type SparseVector = Vec<(usize, u32)>;

/// Lowercases `text` and splits it into maximal runs of word characters
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn count_terms<'a>(tokens: impl Iterator<Item = &'a str>, vocabulary: &HashMap<String, usize>) -> SparseVector {
    let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
    for token in tokens {
        if let Some(&id) = vocabulary.get(token) {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

fn norm(vector: &[(usize, u32)]) -> f64 {
    vector
        .iter()
        .map(|&(_, c)| f64::from(c) * f64::from(c))
        .sum::<f64>()
        .sqrt()
}

/// Term-count matrix over a corpus, one row per document
#[derive(Debug, Clone)]
pub struct TermMatrix {
    /// Sorted vocabulary; position is the term id
    terms: Vec<String>,
    vocabulary: HashMap<String, usize>,
    rows: Vec<SparseVector>,
    norms: Vec<f64>,
}

impl TermMatrix {
    /// Builds the matrix; `None` only for an empty corpus
    ///
    /// A corpus without any tokens still gets one (empty) row per document,
    /// so every cosine against it is zero.
    pub fn build(corpus: &[String]) -> Option<Self> {
        if corpus.is_empty() {
            return None;
        }

        let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| tokenize(doc)).collect();

        let mut sorted: Vec<&str> = tokenized
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        let terms: Vec<String> = sorted.into_iter().map(str::to_string).collect();
        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id))
            .collect();

        let rows: Vec<SparseVector> = tokenized
            .iter()
            .map(|tokens| count_terms(tokens.iter().map(String::as_str), &vocabulary))
            .collect();
        let norms = rows.iter().map(|row| norm(row)).collect();

        Some(Self {
            terms,
            vocabulary,
            rows,
            norms,
        })
    }

    /// Count vector of `query`; out-of-vocabulary tokens are dropped
    pub fn query_vector(&self, query: &str) -> SparseVector {
        let tokens = tokenize(query);
        count_terms(tokens.iter().map(String::as_str), &self.vocabulary)
    }

    /// Cosine similarity between row `row` and `query`
    ///
    /// Zero when either vector is all zeros or the row does not exist.
    pub fn cosine(&self, row: usize, query: &[(usize, u32)]) -> f64 {
        let Some(doc) = self.rows.get(row) else {
            return 0.0;
        };
        let doc_norm = self.norms[row];
        let query_norm = norm(query);
        if doc_norm == 0.0 || query_norm == 0.0 {
            return 0.0;
        }

        // Both vectors are sorted by term id; merge-join them
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < doc.len() && j < query.len() {
            match doc[i].0.cmp(&query[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += f64::from(doc[i].1) * f64::from(query[j].1);
                    i += 1;
                    j += 1;
                }
            }
        }
        dot / (doc_norm * query_norm)
    }

    /// Cosine of `query` against every row, in row order
    pub fn similarities(&self, query: &str) -> Vec<f64> {
        let q = self.query_vector(query);
        (0..self.rows.len()).map(|row| self.cosine(row, &q)).collect()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(tokenize("Hello, World_1 42!"), vec!["hello", "world_1", "42"]);
        assert_eq!(tokenize("Монгол Улс"), vec!["монгол", "улс"]);
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_empty_and_blank_corpus() {
        assert!(TermMatrix::build(&[]).is_none());

        let blank = TermMatrix::build(&corpus(&["", "!!"])).unwrap();
        assert!(blank.vocabulary().is_empty());
        assert_eq!(blank.rows.len(), 2);
        assert_eq!(blank.similarities("anything"), vec![0.0, 0.0]);
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let m = TermMatrix::build(&corpus(&["dog cat", "bird cat"])).unwrap();
        assert_eq!(m.vocabulary(), &["bird", "cat", "dog"]);
        assert_eq!(m.rows[0], vec![(1, 1), (2, 1)]);
        assert_eq!(m.rows[1], vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_self_match_is_one() {
        let text = "the quick brown fox jumps over the lazy dog";
        let m = TermMatrix::build(&corpus(&[text])).unwrap();
        let score = m.cosine(0, &m.query_vector(text));
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_vocabulary_query_scores_zero() {
        let m = TermMatrix::build(&corpus(&["cat dog"])).unwrap();
        assert!(m.query_vector("zebra").is_empty());
        assert_eq!(m.similarities("zebra"), vec![0.0]);
    }

    #[test]
    fn test_repeated_term_ranks_higher() {
        let m = TermMatrix::build(&corpus(&["cat dog", "dog dog dog"])).unwrap();
        let scores = m.similarities("dog");
        assert!(scores[0] > 0.0);
        assert!(scores[1] >= scores[0]);
        assert!((scores[1] - 1.0).abs() < 1e-12);
    }
}
