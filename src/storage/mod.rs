//! Storage module for crawl results
//!
//! This module holds the two in-memory collections a crawl produces and the
//! backend that persists them:
//! - [`DocumentStore`]: URL to extracted [`Document`]
//! - [`LinkGraph`]: directed adjacency between URLs
//! - [`JsonStorage`]: the pages/graph JSON files

mod documents;
mod graph;
mod json;
mod traits;

pub use documents::{Document, DocumentStore};
pub use graph::LinkGraph;
pub use json::JsonStorage;
pub use traits::{Storage, StorageError, StorageResult};
