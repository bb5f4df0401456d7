//! Read (`Finder`) and write (`Repository`) contracts for aggregates.
//!
//! Lookups return `Ok(None)` for a missing entity; only a failing storage
//! backend produces an error. Every operation takes a cancellation token that
//! is checked before any storage call is made.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::Entity;

/// Errors raised by storage collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("operation was cancelled")]
    Cancelled,
    #[error("document '{0}' already exists")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Returns [`StoreError::Cancelled`] once `cancel` has fired.
pub fn ensure_active(cancel: &CancellationToken) -> Result<(), StoreError> {
    if cancel.is_cancelled() {
        return Err(StoreError::Cancelled);
    }
    Ok(())
}

#[async_trait]
pub trait Finder<E: Entity>: Send + Sync {
    async fn get_by_id(
        &self,
        id: &E::Id,
        cancel: &CancellationToken,
    ) -> Result<Option<E>, StoreError>;
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn create(&self, entity: &E, cancel: &CancellationToken) -> Result<(), StoreError>;

    /// Replaces the stored document with the same identity.
    async fn update(&self, entity: &E, cancel: &CancellationToken) -> Result<(), StoreError>;

    async fn delete(&self, entity: &E, cancel: &CancellationToken) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_active_reports_cancellation() {
        let cancel = CancellationToken::new();
        assert!(ensure_active(&cancel).is_ok());

        cancel.cancel();
        assert!(matches!(ensure_active(&cancel), Err(StoreError::Cancelled)));
    }
}
