//!
//! # Custom Error Handling
//!
//! `AppError` is the error type of the HTTP layer. Domain failures, storage
//! errors and dispatch errors are converted into it with `?`, and it
//! implements `actix_web::error::ResponseError` to render them as JSON
//! responses with a matching status code.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use log::error;
use serde_json::json;
use validator::ValidationErrors;

use crate::config::ConfigError;
use crate::cqs::{DispatchError, HandlerError};
use crate::kernel::{Failure, StoreError};
use crate::models::MembershipError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A malformed request (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// A business rule refused the request (HTTP 400).
    #[error("{message}")]
    Failure {
        message: String,
        errors: Vec<String>,
    },
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Storage failures are presented as internal errors (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Input validation failed (HTTP 422).
    #[error("Validation Error: {0}")]
    ValidationError(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Failure { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Failure { message, errors } if !errors.is_empty() => json!({
                "error": message,
                "errors": errors,
            }),
            AppError::Failure { message, .. }
            | AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::InternalServerError(message)
            | AppError::DatabaseError(message)
            | AppError::ValidationError(message) => json!({ "error": message }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<Failure> for AppError {
    fn from(failure: Failure) -> AppError {
        AppError::Failure {
            message: failure.message().to_string(),
            errors: failure.errors().to_vec(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        error!("Storage error: {}", error);
        match error {
            StoreError::Database(e) => AppError::from(e),
            StoreError::Duplicate(id) => AppError::BadRequest(format!("'{}' already exists", id)),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl From<MembershipError> for AppError {
    fn from(error: MembershipError) -> AppError {
        match error {
            MembershipError::Store(e) => AppError::from(e),
            MembershipError::Hash(e) => AppError::from(e),
            MembershipError::Token(e) => AppError::from(e),
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(error: DispatchError) -> AppError {
        match error {
            DispatchError::Failure(failure) => AppError::from(failure),
            DispatchError::Handler(HandlerError::Failure(failure)) => AppError::from(failure),
            DispatchError::Handler(HandlerError::Store(e)) => AppError::from(e),
            DispatchError::Handler(HandlerError::Membership(e)) => AppError::from(e),
            DispatchError::Handler(HandlerError::Email(e)) => {
                error!("Email delivery failed: {}", e);
                AppError::InternalServerError("Email could not be sent".into())
            }
            routing => {
                error!("{}", routing);
                AppError::InternalServerError(routing.to_string())
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Specific cases like `sqlx::Error::RowNotFound` are mapped to `AppError::NotFound`,
/// while other database errors become `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InternalServerError(format!("Failed to issue token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Failed to hash password: {}", error))
    }
}
