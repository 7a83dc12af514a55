//! In-memory document store for testing.
//!
//! Stores all documents in a `BTreeMap` behind a `RwLock`. Nothing is
//! persisted. Names are validated with the same rules as the filesystem
//! backend so tests observe the same rejections.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{DocumentStore, StorageError, validate_name};

/// An in-memory document store backed by a `BTreeMap`.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    docs: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryDocumentStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let docs = self.docs.read().await;
        Ok(docs.keys().cloned().collect())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        validate_name(name)?;
        let docs = self.docs.read().await;
        docs.get(name).cloned().ok_or_else(|| StorageError::NotFound {
            name: name.to_owned(),
        })
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError> {
        validate_name(name)?;
        let mut docs = self.docs.write().await;
        docs.insert(name.to_owned(), content.to_vec());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        validate_name(name)?;
        let mut docs = self.docs.write().await;
        docs.remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound {
                name: name.to_owned(),
            })
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        validate_name(name)?;
        let docs = self.docs.read().await;
        Ok(docs.contains_key(name))
    }
}
