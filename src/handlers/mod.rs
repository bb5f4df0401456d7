//! Command and query handlers, and the start-up wiring that registers them.

pub mod clients;
pub mod todos;
pub mod users;

use std::sync::Arc;

use crate::commands::{
    CompleteTodoCommand, ConfirmEmailCommand, CreatePasswordCommand, CreateTodoCommand,
    DeleteTodoCommand, ForgotPasswordCommand, RegisterUserCommand, ResetPasswordCommand,
    StartTodoCommand, UpdateTodoCommand,
};
use crate::cqs::{CommandDispatcher, DispatchError, QueryProcessor};
use crate::kernel::{Outcome, Repository};
use crate::models::{ClientFinder, EmailSender, Todo, TodoFinder, UserManager};
use crate::queries::{
    AllTodosQuery, TodoByIdQuery, UserByNameQuery, UserInfoQuery, UserNamePasswordLoginQuery,
    ValidateClientQuery, ValidateClientRedirectUriQuery,
};

pub use clients::ClientQueryHandler;
pub use todos::{TodoCommandHandler, TodoQueryHandler};
pub use users::{UserCommandHandler, UserQueryHandler};

/// Collaborators the handlers are built from.
#[derive(Clone)]
pub struct Dependencies {
    pub todo_finder: Arc<dyn TodoFinder>,
    pub todo_repository: Arc<dyn Repository<Todo>>,
    pub clients: Arc<dyn ClientFinder>,
    pub users: Arc<dyn UserManager>,
    pub email: Arc<dyn EmailSender>,
}

/// The populated registries.
pub struct Dispatch {
    pub commands: CommandDispatcher,
    pub queries: QueryProcessor,
}

/// Registers every handler. Fails if a message type is registered twice.
pub fn build_dispatch(deps: Dependencies) -> Result<Dispatch, DispatchError> {
    let todo_commands = Arc::new(TodoCommandHandler::new(
        deps.todo_finder.clone(),
        deps.todo_repository,
    ));
    let user_commands = Arc::new(UserCommandHandler::new(
        deps.users.clone(),
        deps.email,
        deps.clients.clone(),
    ));

    let mut commands = CommandDispatcher::new();
    commands
        .register::<CreateTodoCommand, Outcome, _>(todo_commands.clone())?
        .register::<UpdateTodoCommand, Outcome, _>(todo_commands.clone())?
        .register::<DeleteTodoCommand, Outcome, _>(todo_commands.clone())?
        .register::<StartTodoCommand, Outcome, _>(todo_commands.clone())?
        .register::<CompleteTodoCommand, Outcome, _>(todo_commands)?
        .register::<RegisterUserCommand, Outcome, _>(user_commands.clone())?
        .register::<CreatePasswordCommand, Outcome, _>(user_commands.clone())?
        .register::<ConfirmEmailCommand, Outcome, _>(user_commands.clone())?
        .register::<ForgotPasswordCommand, Outcome, _>(user_commands.clone())?
        .register::<ResetPasswordCommand, Outcome, _>(user_commands)?;

    let todo_queries = Arc::new(TodoQueryHandler::new(deps.todo_finder));
    let client_queries = Arc::new(ClientQueryHandler::new(deps.clients));
    let user_queries = Arc::new(UserQueryHandler::new(deps.users));

    let mut queries = QueryProcessor::new();
    queries
        .register::<TodoByIdQuery, _>(todo_queries.clone())?
        .register::<AllTodosQuery, _>(todo_queries)?
        .register::<ValidateClientQuery, _>(client_queries.clone())?
        .register::<ValidateClientRedirectUriQuery, _>(client_queries)?
        .register::<UserByNameQuery, _>(user_queries.clone())?
        .register::<UserInfoQuery, _>(user_queries.clone())?
        .register::<UserNamePasswordLoginQuery, _>(user_queries)?;

    Ok(Dispatch { commands, queries })
}
