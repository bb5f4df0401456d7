use async_trait::async_trait;
use log::warn;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::document::DocumentCollection;
use crate::kernel::{Entity, Finder, Repository, StoreError};
use crate::models::{Todo, TodoFinder, TodoId};

/// Todo finder and repository over a document collection.
#[derive(Clone)]
pub struct DocumentTodoStore {
    collection: Arc<dyn DocumentCollection>,
}

impl DocumentTodoStore {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl Finder<Todo> for DocumentTodoStore {
    async fn get_by_id(
        &self,
        id: &TodoId,
        cancel: &CancellationToken,
    ) -> Result<Option<Todo>, StoreError> {
        match self.collection.find_one(id.as_str(), cancel).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TodoFinder for DocumentTodoStore {
    async fn all(&self, cancel: &CancellationToken) -> Result<Vec<Todo>, StoreError> {
        self.collection
            .find_all(cancel)
            .await?
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl Repository<Todo> for DocumentTodoStore {
    async fn create(&self, todo: &Todo, cancel: &CancellationToken) -> Result<(), StoreError> {
        let document = serde_json::to_value(todo)?;
        self.collection
            .insert_one(todo.id().as_str(), document, cancel)
            .await
    }

    async fn update(&self, todo: &Todo, cancel: &CancellationToken) -> Result<(), StoreError> {
        let document = serde_json::to_value(todo)?;
        let replaced = self
            .collection
            .replace_one(todo.id().as_str(), document, cancel)
            .await?;
        if !replaced {
            warn!("Update of todo {} matched no document", todo.id());
        }
        Ok(())
    }

    async fn delete(&self, todo: &Todo, cancel: &CancellationToken) -> Result<(), StoreError> {
        self.collection.delete_one(todo.id().as_str(), cancel).await?;
        Ok(())
    }
}
