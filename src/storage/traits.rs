//! Storage trait definitions

use crate::document::{DocPath, Document, PathError};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("Stored body at {0} is not a JSON object")]
    NotADocument(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Write options for [`DocumentStore::set`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Shallow-merge into the stored document instead of replacing it
    pub merge: bool,
}

impl SetOptions {
    pub fn merge() -> Self {
        Self { merge: true }
    }

    pub fn replace() -> Self {
        Self { merge: false }
    }
}

/// Trait for hierarchical document stores
///
/// `set` with `merge: true` merges top-level fields only, atomically per
/// call. Nested values (such as the per-quiz map of a chapter record) are
/// replaced as a whole; callers that need finer-grained merges must compute
/// them before writing.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the document at `path`, or `None` if nothing is stored there
    async fn get(&self, path: &DocPath) -> StorageResult<Option<Document>>;

    /// Write a document, merging or replacing according to `options`
    async fn set(&self, path: &DocPath, document: Document, options: SetOptions) -> StorageResult<()>;

    /// Delete the document at `path`; returns whether one existed
    async fn delete(&self, path: &DocPath) -> StorageResult<bool>;

    /// List the documents stored directly under a collection path
    async fn list(&self, collection: &DocPath) -> StorageResult<Vec<DocPath>>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: DocumentStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
