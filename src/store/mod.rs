//! Document-backed implementations of the finder, repository and user
//! manager contracts.

pub mod clients;
pub mod document;
pub mod membership;
pub mod postgres;
pub mod todos;

use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::StoreError;

pub use clients::{default_web_client, DocumentClientStore, DEFAULT_CLIENT_KEY};
pub use document::{DocumentCollection, MemoryCollection};
pub use membership::DocumentUserManager;
pub use postgres::PgCollection;
pub use todos::DocumentTodoStore;

/// The collections the application keeps, by purpose.
#[derive(Clone)]
pub struct DocumentContext {
    pub todos: Arc<dyn DocumentCollection>,
    pub users: Arc<dyn DocumentCollection>,
    pub clients: Arc<dyn DocumentCollection>,
}

impl DocumentContext {
    pub fn in_memory() -> Self {
        Self {
            todos: Arc::new(MemoryCollection::new("todos")),
            users: Arc::new(MemoryCollection::new("users")),
            clients: Arc::new(MemoryCollection::new("clients")),
        }
    }

    /// Opens one table per collection, creating missing tables.
    pub async fn postgres(pool: PgPool) -> Result<Self, StoreError> {
        let todos = PgCollection::new(pool.clone(), "todos")?;
        let users = PgCollection::new(pool.clone(), "users")?;
        let clients = PgCollection::new(pool, "clients")?;
        for collection in [&todos, &users, &clients] {
            collection.ensure_schema().await?;
        }

        Ok(Self {
            todos: Arc::new(todos),
            users: Arc::new(users),
            clients: Arc::new(clients),
        })
    }

    pub fn todo_store(&self) -> DocumentTodoStore {
        DocumentTodoStore::new(self.todos.clone())
    }

    pub fn client_store(&self) -> DocumentClientStore {
        DocumentClientStore::new(self.clients.clone())
    }
}
