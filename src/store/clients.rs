use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::document::DocumentCollection;
use crate::kernel::{Entity, Finder, StoreError};
use crate::models::{ApplicationType, Client, ClientFinder, ClientId, ClientRegistration};

/// Key of the web client registered at start-up.
pub const DEFAULT_CLIENT_KEY: &str = "todoflowWeb";

/// The public web client seeded into an empty client collection.
pub fn default_web_client() -> ClientRegistration {
    ClientRegistration {
        client_id: DEFAULT_CLIENT_KEY.to_string(),
        client_secret: String::new(),
        name: "Todoflow web client".to_string(),
        application_type: ApplicationType::JavaScript,
        active: true,
        allowed_origin: "http://localhost:5000".to_string(),
        redirect_uri: "http://localhost:5000".to_string(),
        logout_redirect_uri: "http://localhost:5000".to_string(),
        confirmation_uri: "http://localhost:5000".to_string(),
    }
}

/// Client finder over a document collection.
#[derive(Clone)]
pub struct DocumentClientStore {
    collection: Arc<dyn DocumentCollection>,
}

impl DocumentClientStore {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    pub async fn insert(
        &self,
        client: &Client,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        let document = serde_json::to_value(client)?;
        self.collection
            .insert_one(client.id().as_str(), document, cancel)
            .await
    }

    /// Registers [`default_web_client`] unless its key is already taken.
    /// Returns whether a client was added.
    pub async fn seed_default_client(
        &self,
        cancel: &CancellationToken,
    ) -> Result<bool, StoreError> {
        if self
            .get_by_client_id(DEFAULT_CLIENT_KEY, cancel)
            .await?
            .is_some()
        {
            return Ok(false);
        }
        let client = Client::new(ClientId::generate(), default_web_client());
        self.insert(&client, cancel).await?;
        info!("Seeded client {}", DEFAULT_CLIENT_KEY);
        Ok(true)
    }
}

#[async_trait]
impl Finder<Client> for DocumentClientStore {
    async fn get_by_id(
        &self,
        id: &ClientId,
        cancel: &CancellationToken,
    ) -> Result<Option<Client>, StoreError> {
        match self.collection.find_one(id.as_str(), cancel).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ClientFinder for DocumentClientStore {
    async fn get_by_client_id(
        &self,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Client>, StoreError> {
        match self
            .collection
            .find_one_by("client_id", client_id, cancel)
            .await?
        {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCollection;

    #[actix_rt::test]
    async fn test_seeding_is_idempotent() {
        let collection = Arc::new(MemoryCollection::new("clients"));
        let store = DocumentClientStore::new(collection.clone());
        let cancel = CancellationToken::new();

        assert!(store.seed_default_client(&cancel).await.unwrap());
        assert!(!store.seed_default_client(&cancel).await.unwrap());
        assert_eq!(collection.len().await, 1);
    }

    #[actix_rt::test]
    async fn test_lookup_by_key_and_by_id() {
        let store = DocumentClientStore::new(Arc::new(MemoryCollection::new("clients")));
        let cancel = CancellationToken::new();
        store.seed_default_client(&cancel).await.unwrap();

        let by_key = store
            .get_by_client_id(DEFAULT_CLIENT_KEY, &cancel)
            .await
            .unwrap()
            .unwrap();
        assert!(by_key.is_active());

        let by_id = store.get_by_id(by_key.id(), &cancel).await.unwrap().unwrap();
        assert_eq!(by_id, by_key);
        assert!(store
            .get_by_client_id("unknown", &cancel)
            .await
            .unwrap()
            .is_none());
    }
}
