//! In-process document store

use super::traits::{DocumentStore, SetOptions, StorageResult};
use crate::document::{shallow_merge, DocPath, Document};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Document store backed by a concurrent hash map
///
/// Nothing is persisted. Each `set` holds the shard lock for its path, so a
/// merging write is atomic with respect to other writes to the same path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<DocPath, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> StorageResult<Option<Document>> {
        Ok(self.documents.get(path).map(|r| r.value().clone()))
    }

    async fn set(&self, path: &DocPath, document: Document, options: SetOptions) -> StorageResult<()> {
        match self.documents.entry(path.clone()) {
            Entry::Occupied(mut entry) if options.merge => shallow_merge(entry.get_mut(), document),
            Entry::Occupied(mut entry) => {
                entry.insert(document);
            }
            Entry::Vacant(entry) => {
                entry.insert(document);
            }
        }
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> StorageResult<bool> {
        Ok(self.documents.remove(path).is_some())
    }

    async fn list(&self, collection: &DocPath) -> StorageResult<Vec<DocPath>> {
        let mut paths: Vec<DocPath> = self
            .documents
            .iter()
            .filter(|r| r.key().parent().as_ref() == Some(collection))
            .map(|r| r.key().clone())
            .collect();
        paths.sort();
        Ok(paths)
    }
}
