//! Retrieval metrics over ranked URL lists
//!
//! The metric functions are standard. [`evaluate`] is not: lacking human
//! relevance judgments, it treats the first three retrieved URLs as the
//! relevant set, so its numbers describe the shape of the result list
//! rather than retrieval quality.

use serde::Serialize;

/// Size of the relevant set assumed by [`evaluate`]
pub const ASSUMED_RELEVANT: usize = 3;

/// Cut-off cap used by [`evaluate`]
pub const EVAL_CUTOFF: usize = 10;

/// Fraction of the top `k` retrieved items that are relevant
pub fn precision_at_k<T: PartialEq>(relevant: &[T], retrieved: &[T], k: usize) -> f64 {
    let top = &retrieved[..k.min(retrieved.len())];
    if top.is_empty() {
        return 0.0;
    }
    let hits = top.iter().filter(|doc| relevant.contains(doc)).count();
    hits as f64 / top.len() as f64
}

/// Fraction of relevant items found in the top `k` retrieved
pub fn recall_at_k<T: PartialEq>(relevant: &[T], retrieved: &[T], k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let top = &retrieved[..k.min(retrieved.len())];
    let hits = top.iter().filter(|doc| relevant.contains(doc)).count();
    hits as f64 / relevant.len() as f64
}

pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Binary-relevance NDCG at `k`
///
/// The ideal ranking places `min(|relevant|, k)` relevant items first.
pub fn ndcg_at_k<T: PartialEq>(relevant: &[T], retrieved: &[T], k: usize) -> f64 {
    let discount = |rank: usize| 1.0 / ((rank + 1) as f64).log2();

    let dcg: f64 = retrieved
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, doc)| relevant.contains(doc))
        .map(|(i, _)| discount(i + 1))
        .sum();
    let idcg: f64 = (1..=relevant.len().min(k)).map(discount).sum();

    if idcg > 0.0 {
        dcg / idcg
    } else {
        0.0
    }
}

/// Metrics reported alongside a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub ndcg: f64,
}

/// Self-referential evaluation of a result list
///
/// Takes the top three retrieved URLs as ground truth and measures the
/// full list against them at `k = min(10, n)`. The relevant set is derived
/// from the system's own output, so these are not quality measures.
pub fn evaluate<T: PartialEq>(retrieved: &[T]) -> EvaluationReport {
    let relevant = &retrieved[..ASSUMED_RELEVANT.min(retrieved.len())];
    let k = EVAL_CUTOFF.min(retrieved.len());

    let precision = precision_at_k(relevant, retrieved, k);
    let recall = recall_at_k(relevant, retrieved, k);

    EvaluationReport {
        precision,
        recall,
        f1: f1_score(precision, recall),
        ndcg: ndcg_at_k(relevant, retrieved, k),
    }
}
