use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::commands::{
    CompleteTodoCommand, CreateTodoCommand, DeleteTodoCommand, StartTodoCommand, TodoTransition,
    UpdateTodoCommand,
};
use crate::cqs::{CommandHandler, HandlerError, QueryHandler};
use crate::kernel::{ApplyAction, Entity, Finder, Outcome, Repository};
use crate::models::{Todo, TodoAction, TodoFinder, TodoId, TodoResult};
use crate::queries::{AllTodosQuery, TodoByIdQuery};

pub const TODO_NOT_FOUND: &str = "Todo does not exists in the system.";

/// Handles every todo command.
pub struct TodoCommandHandler {
    finder: Arc<dyn TodoFinder>,
    repository: Arc<dyn Repository<Todo>>,
}

impl TodoCommandHandler {
    pub fn new(finder: Arc<dyn TodoFinder>, repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { finder, repository }
    }

    /// A blank id names no todo.
    async fn load(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Todo>, HandlerError> {
        let Ok(id) = TodoId::new(id) else {
            return Ok(None);
        };
        Ok(self.finder.get_by_id(&id, cancel).await?)
    }

    async fn transition(
        &self,
        id: &str,
        action: TodoAction,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let Some(mut todo) = self.load(id, &cancel).await? else {
            warn!("Cannot move todo {} to {}: not found", id, action.state());
            return Ok(Outcome::fail(TODO_NOT_FOUND));
        };

        todo.apply_action(action);
        self.repository.update(&todo, &cancel).await?;
        info!("Todo {} is now {}", id, todo.state());
        Ok(Outcome::ok())
    }
}

#[async_trait]
impl CommandHandler<CreateTodoCommand, Outcome> for TodoCommandHandler {
    async fn handle(
        &self,
        command: CreateTodoCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let todo = Todo::new(command.id, command.description);
        self.repository.create(&todo, &cancel).await?;
        info!("Created todo {}", todo.id());
        Ok(Outcome::ok())
    }
}

#[async_trait]
impl CommandHandler<UpdateTodoCommand, Outcome> for TodoCommandHandler {
    async fn handle(
        &self,
        command: UpdateTodoCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let Some(mut todo) = self.load(&command.id, &cancel).await? else {
            return Ok(Outcome::fail(TODO_NOT_FOUND));
        };

        todo.change_description(command.description);
        self.repository.update(&todo, &cancel).await?;
        Ok(Outcome::ok())
    }
}

#[async_trait]
impl CommandHandler<DeleteTodoCommand, Outcome> for TodoCommandHandler {
    async fn handle(
        &self,
        command: DeleteTodoCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let Some(todo) = self.load(&command.id, &cancel).await? else {
            return Ok(Outcome::fail(TODO_NOT_FOUND));
        };

        self.repository.delete(&todo, &cancel).await?;
        info!("Deleted todo {}", command.id);
        Ok(Outcome::ok())
    }
}

#[async_trait]
impl CommandHandler<StartTodoCommand, Outcome> for TodoCommandHandler {
    async fn handle(
        &self,
        command: StartTodoCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        self.transition(command.todo_id(), StartTodoCommand::ACTION, cancel)
            .await
    }
}

#[async_trait]
impl CommandHandler<CompleteTodoCommand, Outcome> for TodoCommandHandler {
    async fn handle(
        &self,
        command: CompleteTodoCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        self.transition(command.todo_id(), CompleteTodoCommand::ACTION, cancel)
            .await
    }
}

pub struct TodoQueryHandler {
    finder: Arc<dyn TodoFinder>,
}

impl TodoQueryHandler {
    pub fn new(finder: Arc<dyn TodoFinder>) -> Self {
        Self { finder }
    }
}

#[async_trait]
impl QueryHandler<TodoByIdQuery> for TodoQueryHandler {
    async fn execute(
        &self,
        query: TodoByIdQuery,
        cancel: CancellationToken,
    ) -> Result<Option<TodoResult>, HandlerError> {
        let Ok(id) = TodoId::new(query.id) else {
            return Ok(None);
        };
        let todo = self.finder.get_by_id(&id, &cancel).await?;
        Ok(todo.as_ref().map(TodoResult::from))
    }
}

#[async_trait]
impl QueryHandler<AllTodosQuery> for TodoQueryHandler {
    async fn execute(
        &self,
        _query: AllTodosQuery,
        cancel: CancellationToken,
    ) -> Result<Vec<TodoResult>, HandlerError> {
        let todos = self.finder.all(&cancel).await?;
        Ok(todos.iter().map(TodoResult::from).collect())
    }
}
