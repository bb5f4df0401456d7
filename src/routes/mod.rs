pub mod account;
pub mod health;
pub mod todos;

use actix_web::{web, HttpResponse};

use crate::kernel::Outcome;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/todos")
            .service(todos::get_todos)
            .service(todos::create_todo)
            .service(todos::get_todo)
            .service(todos::update_todo)
            .service(todos::start_todo)
            .service(todos::complete_todo)
            .service(todos::delete_todo),
    )
    .service(
        web::scope("/account")
            .service(account::register)
            .service(account::confirm_email)
            .service(account::forgot_password)
            .service(account::reset_password)
            .service(account::create_password)
            .service(account::login)
            .service(account::user_info),
    );
}

/// `200 OK` for a succeeded outcome, `400 Bad Request` otherwise. The outcome
/// is the body either way.
pub(crate) fn outcome_response(outcome: Outcome) -> HttpResponse {
    if outcome.succeeded() {
        HttpResponse::Ok().json(outcome)
    } else {
        HttpResponse::BadRequest().json(outcome)
    }
}
