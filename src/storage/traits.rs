//! Storage traits and error types
//!
//! This module defines the trait interface for persistence backends and
//! associated error types.

use crate::storage::{DocumentStore, LinkGraph};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error on {path}: {source}")]
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for persistence backends of a finished crawl
///
/// Both collections are written and read wholesale.
pub trait Storage {
    /// Persists the document store
    fn save_pages(&self, pages: &DocumentStore) -> StorageResult<()>;

    /// Persists the link graph
    fn save_graph(&self, graph: &LinkGraph) -> StorageResult<()>;

    /// Loads the document store
    fn load_pages(&self) -> StorageResult<DocumentStore>;

    /// Loads the link graph
    fn load_graph(&self) -> StorageResult<LinkGraph>;
}
