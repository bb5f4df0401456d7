use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

use super::outcome_response;
use crate::commands::{
    CompleteTodoCommand, CreateTodoCommand, DeleteTodoCommand, StartTodoCommand, UpdateTodoCommand,
};
use crate::error::AppError;
use crate::handlers::Dispatch;
use crate::kernel::Outcome;
use crate::queries::{AllTodosQuery, TodoByIdQuery};

/// Body of `PUT /todos/{id}`. The id comes from the path.
#[derive(Debug, Deserialize)]
pub struct TodoDescription {
    pub description: String,
}

/// Lists every todo.
///
/// ## Responses:
/// - `200 OK`: A JSON array of todos.
/// - `500 Internal Server Error`: For storage errors.
#[get("")]
pub async fn get_todos(dispatch: web::Data<Dispatch>) -> Result<impl Responder, AppError> {
    let todos = dispatch.queries.process(AllTodosQuery).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a pending todo with a server-assigned id.
///
/// ## Request Body:
/// - `description`: 1 to 500 characters.
///
/// ## Responses:
/// - `201 Created`: The new todo, with its URL in the `Location` header.
/// - `422 Unprocessable Entity`: If the description fails validation.
/// - `500 Internal Server Error`: For storage errors.
#[post("")]
pub async fn create_todo(
    dispatch: web::Data<Dispatch>,
    command: web::Json<CreateTodoCommand>,
) -> Result<impl Responder, AppError> {
    command.validate()?;

    let command = command.into_inner();
    let id = command.id.to_string();
    let outcome: Outcome = dispatch.commands.dispatch(command).await?;
    if !outcome.succeeded() {
        return Ok(outcome_response(outcome));
    }

    match dispatch.queries.process(TodoByIdQuery { id: id.clone() }).await? {
        Some(todo) => Ok(HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/api/todos/{}", id)))
            .json(todo)),
        None => Err(AppError::InternalServerError(format!(
            "Todo {} was not stored",
            id
        ))),
    }
}

/// Retrieves a todo by id.
///
/// ## Responses:
/// - `200 OK`: The todo.
/// - `404 Not Found`: If no todo has that id.
#[get("/{id}")]
pub async fn get_todo(
    dispatch: web::Data<Dispatch>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = id.into_inner();
    match dispatch.queries.process(TodoByIdQuery { id: id.clone() }).await? {
        Some(todo) => Ok(HttpResponse::Ok().json(todo)),
        None => Err(AppError::NotFound(format!("Todo {} not found", id))),
    }
}

/// Replaces the description of a todo.
///
/// ## Responses:
/// - `200 OK`: The succeeded outcome.
/// - `400 Bad Request`: If the todo does not exist.
/// - `422 Unprocessable Entity`: If the description fails validation.
#[put("/{id}")]
pub async fn update_todo(
    dispatch: web::Data<Dispatch>,
    id: web::Path<String>,
    body: web::Json<TodoDescription>,
) -> Result<impl Responder, AppError> {
    let command = UpdateTodoCommand {
        id: id.into_inner(),
        description: body.into_inner().description,
    };
    command.validate()?;

    let outcome: Outcome = dispatch.commands.dispatch(command).await?;
    Ok(outcome_response(outcome))
}

#[post("/{id}/start")]
pub async fn start_todo(
    dispatch: web::Data<Dispatch>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let command = StartTodoCommand { id: id.into_inner() };
    command.validate()?;

    let outcome: Outcome = dispatch.commands.dispatch(command).await?;
    Ok(outcome_response(outcome))
}

#[post("/{id}/complete")]
pub async fn complete_todo(
    dispatch: web::Data<Dispatch>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let command = CompleteTodoCommand { id: id.into_inner() };
    command.validate()?;

    let outcome: Outcome = dispatch.commands.dispatch(command).await?;
    Ok(outcome_response(outcome))
}

/// Deletes a todo.
///
/// ## Responses:
/// - `200 OK`: The succeeded outcome.
/// - `400 Bad Request`: If the todo does not exist.
#[delete("/{id}")]
pub async fn delete_todo(
    dispatch: web::Data<Dispatch>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let command = DeleteTodoCommand { id: id.into_inner() };
    command.validate()?;

    let outcome: Outcome = dispatch.commands.dispatch(command).await?;
    Ok(outcome_response(outcome))
}
