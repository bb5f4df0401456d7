//! Account endpoints. Each body is the matching command or query, validated
//! before it is dispatched.

use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

use super::outcome_response;
use crate::commands::{
    ConfirmEmailCommand, CreatePasswordCommand, ForgotPasswordCommand, RegisterUserCommand,
    ResetPasswordCommand,
};
use crate::cqs::Command;
use crate::error::AppError;
use crate::handlers::Dispatch;
use crate::kernel::Outcome;
use crate::queries::{UserInfoQuery, UserNamePasswordLoginQuery};

async fn run<C>(dispatch: &Dispatch, command: C) -> Result<HttpResponse, AppError>
where
    C: Command + Validate,
{
    command.validate()?;
    let outcome: Outcome = dispatch.commands.dispatch(command).await?;
    Ok(outcome_response(outcome))
}

/// Registers an account and emails a confirmation link through the client's
/// confirmation page.
#[post("/register")]
pub async fn register(
    dispatch: web::Data<Dispatch>,
    command: web::Json<RegisterUserCommand>,
) -> Result<impl Responder, AppError> {
    run(&dispatch, command.into_inner()).await
}

#[post("/confirm-email")]
pub async fn confirm_email(
    dispatch: web::Data<Dispatch>,
    command: web::Json<ConfirmEmailCommand>,
) -> Result<impl Responder, AppError> {
    run(&dispatch, command.into_inner()).await
}

/// Emails a password reset link to a confirmed account.
#[post("/forgot-password")]
pub async fn forgot_password(
    dispatch: web::Data<Dispatch>,
    command: web::Json<ForgotPasswordCommand>,
) -> Result<impl Responder, AppError> {
    run(&dispatch, command.into_inner()).await
}

#[post("/reset-password")]
pub async fn reset_password(
    dispatch: web::Data<Dispatch>,
    command: web::Json<ResetPasswordCommand>,
) -> Result<impl Responder, AppError> {
    run(&dispatch, command.into_inner()).await
}

#[post("/create-password")]
pub async fn create_password(
    dispatch: web::Data<Dispatch>,
    command: web::Json<CreatePasswordCommand>,
) -> Result<impl Responder, AppError> {
    run(&dispatch, command.into_inner()).await
}

/// Checks a user name and password.
///
/// ## Responses:
/// - `200 OK`: The accepted login, with the user's id and name.
/// - `400 Bad Request`: The rejected login.
/// - `422 Unprocessable Entity`: If either field is empty.
#[post("/login")]
pub async fn login(
    dispatch: web::Data<Dispatch>,
    query: web::Json<UserNamePasswordLoginQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;

    let result = dispatch.queries.process(query.into_inner()).await?;
    if result.outcome.succeeded() {
        Ok(HttpResponse::Ok().json(result))
    } else {
        Ok(HttpResponse::BadRequest().json(result))
    }
}

#[get("/userinfo/{id}")]
pub async fn user_info(
    dispatch: web::Data<Dispatch>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = id.into_inner();
    match dispatch.queries.process(UserInfoQuery { id: id.clone() }).await? {
        Some(info) => Ok(HttpResponse::Ok().json(info)),
        None => Err(AppError::NotFound(format!("User {} not found", id))),
    }
}
