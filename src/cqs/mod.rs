//! Command/query dispatch.
//!
//! Entry points build a command or query and hand it to the
//! [`CommandDispatcher`] or [`QueryProcessor`], which look up the handler
//! registered for that exact type at start-up and invoke it. Handlers own all
//! side effects; the dispatch layer only routes.

pub mod command;
pub mod query;

pub use command::{Command, CommandDispatcher, CommandHandler};
pub use query::{Query, QueryHandler, QueryProcessor};

use crate::kernel::{Failure, StoreError};
use crate::models::membership::{EmailError, MembershipError};

/// Error raised by a handler: a domain failure or a failing collaborator.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Failure(#[from] Failure),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Membership(#[from] MembershipError),
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Errors surfaced to callers of the dispatcher and processor.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no handler registered for {message} returning {output}")]
    NoHandler {
        message: &'static str,
        output: &'static str,
    },
    #[error("a handler is already registered for {message} returning {output}")]
    DuplicateHandler {
        message: &'static str,
        output: &'static str,
    },
    #[error(transparent)]
    Failure(#[from] Failure),
    /// A collaborator (store, identity provider, mail service) failed.
    #[error(transparent)]
    Handler(HandlerError),
}

impl From<HandlerError> for DispatchError {
    fn from(error: HandlerError) -> Self {
        match error {
            HandlerError::Failure(failure) => DispatchError::Failure(failure),
            other => DispatchError::Handler(other),
        }
    }
}
