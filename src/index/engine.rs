//! Search index lifecycle
//!
//! A [`SearchIndex`] holds everything a query needs: the document store,
//! a term matrix over re-normalized document texts, and PageRank scores.
//! It is built from in-memory crawl results or loaded from the persisted
//! pages/graph files. Build problems never fail: a missing or malformed
//! file, or an empty corpus, yields an empty index and a warning.

use crate::config::{Config, RankingConfig};
use crate::index::pagerank::{compute_pagerank, PageRankScores};
use crate::index::ranker::{rank, RankOptions, RankedResult};
use crate::index::snippet::preview;
use crate::index::vectorizer::TermMatrix;
use crate::storage::{DocumentStore, JsonStorage, LinkGraph, Storage, StorageError};
use crate::text::normalize_text;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Queryable snapshot of a crawl
#[derive(Debug, Clone)]
pub struct SearchIndex {
    pages: DocumentStore,
    matrix: Option<TermMatrix>,
    pagerank: PageRankScores,
    ranking: RankingConfig,
    storage: Option<JsonStorage>,
    /// Modification time of the pages file at the last build
    pages_mtime: Option<SystemTime>,
}

impl SearchIndex {
    /// Index with no documents; every query returns `[]`
    pub fn empty(ranking: &RankingConfig) -> Self {
        Self {
            pages: DocumentStore::new(),
            matrix: None,
            pagerank: PageRankScores::default(),
            ranking: ranking.clone(),
            storage: None,
            pages_mtime: None,
        }
    }

    /// Builds an index from in-memory crawl results
    ///
    /// Document texts are normalized again (per their detected language)
    /// before vectorizing; the stored texts themselves are left untouched.
    pub fn build(pages: DocumentStore, graph: &LinkGraph, ranking: &RankingConfig) -> Self {
        let corpus: Vec<String> = pages.iter().map(|doc| normalize_text(&doc.text)).collect();
        let matrix = TermMatrix::build(&corpus);
        match &matrix {
            None => tracing::warn!("Empty corpus, queries will return nothing"),
            Some(m) if m.vocabulary().is_empty() => tracing::warn!(
                "No indexable terms in {} documents, queries fall back to PageRank",
                pages.len()
            ),
            Some(_) => {}
        }

        let pagerank = compute_pagerank(
            graph,
            ranking.damping,
            ranking.max_iterations,
            ranking.tolerance,
        );
        if pagerank.is_empty() {
            tracing::warn!("Link graph is empty, ranking without PageRank");
        }

        tracing::info!(
            "Index built: {} documents, {} terms, {} graph nodes",
            pages.len(),
            matrix.as_ref().map_or(0, |m| m.vocabulary().len()),
            pagerank.len()
        );

        Self {
            pages,
            matrix,
            pagerank,
            ranking: ranking.clone(),
            storage: None,
            pages_mtime: None,
        }
    }

    /// Loads and builds the index from the configured output files
    pub fn load(config: &Config) -> Self {
        let mut index = Self::empty(&config.ranking);
        index.storage = Some(JsonStorage::new(
            &config.output.pages_path,
            &config.output.graph_path,
        ));
        index.refresh(true);
        index
    }

    /// Rebuilds from disk if the pages file changed since the last build
    ///
    /// With `force` the rebuild always happens (e.g. right after a crawl).
    /// Returns true when the index was rebuilt. An index not backed by
    /// files never rebuilds.
    pub fn refresh(&mut self, force: bool) -> bool {
        let Some(storage) = self.storage.clone() else {
            return false;
        };

        let mtime = modified_time(storage.pages_path());
        if !force && mtime == self.pages_mtime && self.matrix.is_some() {
            return false;
        }

        let pages = storage.load_pages().unwrap_or_else(|e| {
            log_load_failure("pages", &e);
            DocumentStore::new()
        });
        let graph = storage.load_graph().unwrap_or_else(|e| {
            log_load_failure("graph", &e);
            LinkGraph::new()
        });

        let rebuilt = Self::build(pages, &graph, &self.ranking);
        self.pages = rebuilt.pages;
        self.matrix = rebuilt.matrix;
        self.pagerank = rebuilt.pagerank;
        self.pages_mtime = mtime;
        true
    }

    /// Ranks documents for `query`, returning at most `top_k` results
    pub fn rank(&self, query: &str, top_k: usize) -> Vec<RankedResult> {
        let options = RankOptions {
            top_k,
            ..RankOptions::from(&self.ranking)
        };
        rank(
            query,
            &self.pages,
            self.matrix.as_ref(),
            &self.pagerank,
            &options,
        )
    }

    /// Ranks with the configured result cap
    pub fn search(&self, query: &str) -> Vec<RankedResult> {
        self.rank(query, self.ranking.top_k)
    }

    /// `(url, preview)` for every stored page, in store order
    pub fn previews(&self) -> Vec<(&str, String)> {
        self.pages
            .iter()
            .map(|doc| (doc.url.as_str(), preview(&doc.text)))
            .collect()
    }

    pub fn pages(&self) -> &DocumentStore {
        &self.pages
    }

    pub fn pagerank(&self) -> &PageRankScores {
        &self.pagerank
    }

    pub fn matrix(&self) -> Option<&TermMatrix> {
        self.matrix.as_ref()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn log_load_failure(what: &str, error: &StorageError) {
    match error {
        StorageError::NotFound(path) => {
            tracing::warn!("No {} file at {}, using an empty one", what, path.display())
        }
        other => tracing::warn!("Could not load {}: {}", what, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Document;

    fn sample_pages() -> DocumentStore {
        let mut pages = DocumentStore::new();
        pages.insert(Document::new("http://a.com/", "A", "Cat dog"));
        pages.insert(Document::new("http://b.com/", "B", "dog dog dog"));
        pages
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = SearchIndex::empty(&RankingConfig::default());
        assert!(index.is_empty());
        assert!(index.rank("dog", 10).is_empty());
    }

    #[test]
    fn test_build_renormalizes_for_matrix_only() {
        let index = SearchIndex::build(sample_pages(), &LinkGraph::new(), &RankingConfig::default());
        let vocabulary = index.matrix().unwrap().vocabulary();
        assert_eq!(vocabulary, &["cat", "dog"]);
        assert_eq!(index.pages().get("http://a.com/").unwrap().text, "Cat dog");
    }

    #[test]
    fn test_blank_corpus_falls_back_to_pagerank() {
        let mut pages = DocumentStore::new();
        pages.insert(Document::new("http://a.com/", "A", ""));
        pages.insert(Document::new("http://b.com/", "B", ""));
        let mut graph = LinkGraph::new();
        graph.add_edge("http://a.com/", "http://b.com/");

        let index = SearchIndex::build(pages, &graph, &RankingConfig::default());
        let results = index.rank("anything", 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "http://b.com/");
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[1].score, 0.0);
    }

    #[test]
    fn test_rank_respects_top_k() {
        let index = SearchIndex::build(sample_pages(), &LinkGraph::new(), &RankingConfig::default());
        assert_eq!(index.rank("dog", 1).len(), 1);
        assert_eq!(index.rank("dog", 1)[0].url, "http://b.com/");
        assert_eq!(index.search("dog").len(), 2);
    }

    #[test]
    fn test_unbacked_index_never_refreshes() {
        let mut index = SearchIndex::build(sample_pages(), &LinkGraph::new(), &RankingConfig::default());
        assert!(!index.refresh(true));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_previews_in_store_order() {
        let index = SearchIndex::build(sample_pages(), &LinkGraph::new(), &RankingConfig::default());
        let previews = index.previews();
        assert_eq!(previews[0], ("http://a.com/", "Cat dog".to_string()));
        assert_eq!(previews[1].0, "http://b.com/");
    }
}
