use async_trait::async_trait;
use log::debug;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{DispatchError, HandlerError};

/// A read request, parameterised by the type it resolves to.
pub trait Query: Send + 'static {
    type Output: Send + 'static;
}

#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync {
    async fn execute(&self, query: Q, cancel: CancellationToken)
        -> Result<Q::Output, HandlerError>;
}

/// Routes each query to the handler registered for its type.
#[derive(Default)]
pub struct QueryProcessor {
    // Each value is an `Arc<dyn QueryHandler<Q>>` for the key's Q.
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl QueryProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<Q, H>(&mut self, handler: Arc<H>) -> Result<&mut Self, DispatchError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let key = TypeId::of::<Q>();
        if self.handlers.contains_key(&key) {
            return Err(DispatchError::DuplicateHandler {
                message: type_name::<Q>(),
                output: type_name::<Q::Output>(),
            });
        }
        let handler: Arc<dyn QueryHandler<Q>> = handler;
        self.handlers.insert(key, Box::new(handler));
        Ok(self)
    }

    pub fn handles<Q: Query>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<Q>())
    }

    pub async fn process<Q: Query>(&self, query: Q) -> Result<Q::Output, DispatchError> {
        self.process_with(query, CancellationToken::new()).await
    }

    pub async fn process_with<Q: Query>(
        &self,
        query: Q,
        cancel: CancellationToken,
    ) -> Result<Q::Output, DispatchError> {
        let handler = self
            .handlers
            .get(&TypeId::of::<Q>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn QueryHandler<Q>>>())
            .cloned()
            .ok_or(DispatchError::NoHandler {
                message: type_name::<Q>(),
                output: type_name::<Q::Output>(),
            })?;

        debug!("Processing {}", type_name::<Q>());
        Ok(handler.execute(query, cancel).await?)
    }
}
