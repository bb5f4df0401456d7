use async_trait::async_trait;
use log::debug;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{DispatchError, HandlerError};

/// Marker for requests that change state.
pub trait Command: Send + 'static {}

/// Handles command `C`, producing `R`.
#[async_trait]
pub trait CommandHandler<C: Command, R>: Send + Sync {
    async fn handle(&self, command: C, cancel: CancellationToken) -> Result<R, HandlerError>;
}

type HandlerKey = (TypeId, TypeId);

/// Routes each command to the single handler registered for its
/// `(command type, result type)` pair.
#[derive(Default)]
pub struct CommandDispatcher {
    // Each value is an `Arc<dyn CommandHandler<C, R>>` for the key's C and R.
    handlers: HashMap<HandlerKey, Box<dyn Any + Send + Sync>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for commands of type `C` returning `R`.
    pub fn register<C, R, H>(&mut self, handler: Arc<H>) -> Result<&mut Self, DispatchError>
    where
        C: Command,
        R: Send + 'static,
        H: CommandHandler<C, R> + 'static,
    {
        let key = (TypeId::of::<C>(), TypeId::of::<R>());
        if self.handlers.contains_key(&key) {
            return Err(DispatchError::DuplicateHandler {
                message: type_name::<C>(),
                output: type_name::<R>(),
            });
        }
        let handler: Arc<dyn CommandHandler<C, R>> = handler;
        self.handlers.insert(key, Box::new(handler));
        Ok(self)
    }

    pub fn handles<C: Command, R: 'static>(&self) -> bool {
        self.handlers
            .contains_key(&(TypeId::of::<C>(), TypeId::of::<R>()))
    }

    pub async fn dispatch<C, R>(&self, command: C) -> Result<R, DispatchError>
    where
        C: Command,
        R: Send + 'static,
    {
        self.dispatch_with(command, CancellationToken::new()).await
    }

    /// Dispatches `command`, letting the handler observe `cancel`.
    pub async fn dispatch_with<C, R>(
        &self,
        command: C,
        cancel: CancellationToken,
    ) -> Result<R, DispatchError>
    where
        C: Command,
        R: Send + 'static,
    {
        let handler = self
            .handlers
            .get(&(TypeId::of::<C>(), TypeId::of::<R>()))
            .and_then(|entry| entry.downcast_ref::<Arc<dyn CommandHandler<C, R>>>())
            .cloned()
            .ok_or(DispatchError::NoHandler {
                message: type_name::<C>(),
                output: type_name::<R>(),
            })?;

        debug!("Dispatching {}", type_name::<C>());
        Ok(handler.handle(command, cancel).await?)
    }
}
