//! Indexing and ranking
//!
//! This module turns a finished crawl into something queryable:
//! - Term-count vectors and cosine similarity
//! - PageRank over the link graph
//! - Blended ranking with a PageRank-only fallback
//! - Snippets, previews and evaluation metrics

mod engine;
pub mod eval;
mod pagerank;
mod ranker;
mod snippet;
mod vectorizer;

pub use engine::SearchIndex;
pub use eval::{evaluate, EvaluationReport};
pub use pagerank::{compute_pagerank, PageRankScores};
pub use ranker::{min_max_normalize, rank, RankOptions, RankedResult};
pub use snippet::{make_snippet, preview, DEFAULT_SNIPPET_LENGTH, PREVIEW_LENGTH};
pub use vectorizer::{tokenize, SparseVector, TermMatrix};
