//! JSON document collections: the storage primitive every store is built on.
//!
//! A collection holds one document per id. Documents are plain
//! `serde_json::Value`s; stores convert to and from their entities.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::kernel::{ensure_active, StoreError};

#[async_trait]
pub trait DocumentCollection: Send + Sync {
    fn name(&self) -> &str;

    /// Fails with [`StoreError::Duplicate`] when `id` is taken.
    async fn insert_one(
        &self,
        id: &str,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError>;

    /// Returns `false` when no document has `id`.
    async fn replace_one(
        &self,
        id: &str,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<bool, StoreError>;

    /// Returns `false` when no document has `id`.
    async fn delete_one(&self, id: &str, cancel: &CancellationToken) -> Result<bool, StoreError>;

    async fn find_one(&self, id: &str, cancel: &CancellationToken)
        -> Result<Option<Value>, StoreError>;

    /// First document whose top-level string `field` equals `value`.
    async fn find_one_by(
        &self,
        field: &str,
        value: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, StoreError>;

    async fn find_all(&self, cancel: &CancellationToken) -> Result<Vec<Value>, StoreError>;
}

/// Collection kept in process memory, ordered by id.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    name: String,
    documents: RwLock<BTreeMap<String, Value>>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(
        &self,
        id: &str,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        ensure_active(cancel)?;
        let mut documents = self.documents.write().await;
        if documents.contains_key(id) {
            return Err(StoreError::Duplicate(id.to_string()));
        }
        documents.insert(id.to_string(), document);
        Ok(())
    }

    async fn replace_one(
        &self,
        id: &str,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<bool, StoreError> {
        ensure_active(cancel)?;
        let mut documents = self.documents.write().await;
        match documents.get_mut(id) {
            Some(existing) => {
                *existing = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, id: &str, cancel: &CancellationToken) -> Result<bool, StoreError> {
        ensure_active(cancel)?;
        Ok(self.documents.write().await.remove(id).is_some())
    }

    async fn find_one(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, StoreError> {
        ensure_active(cancel)?;
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn find_one_by(
        &self,
        field: &str,
        value: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, StoreError> {
        ensure_active(cancel)?;
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .find(|document| document.get(field).and_then(Value::as_str) == Some(value))
            .cloned())
    }

    async fn find_all(&self, cancel: &CancellationToken) -> Result<Vec<Value>, StoreError> {
        ensure_active(cancel)?;
        Ok(self.documents.read().await.values().cloned().collect())
    }
}
