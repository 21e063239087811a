//! URL handling module for Linkrank
//!
//! This module provides URL normalization and origin/domain extraction.
//! The crawler frontier and the link extractor both go through
//! [`normalize_url`], so dedup keys are always computed the same way.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, origin_of};
pub use normalize::normalize_url;
