use lazy_static::lazy_static;
use serde::Deserialize;
use validator::Validate;

use crate::cqs::Command;

lazy_static! {
    // Client keys are short ascii tokens such as "todoflowWeb".
    static ref CLIENT_KEY_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();
}

/// Registers an account for `email` through the client identified by `client_key`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserCommand {
    #[validate(email)]
    pub email: String,
    #[validate(regex(path = "CLIENT_KEY_REGEX", message = "Client key is invalid"))]
    pub client_key: String,
}

/// Sets the first password of a registered account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePasswordCommand {
    #[validate(length(min = 1))]
    pub user_name: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmEmailCommand {
    #[validate(length(min = 1))]
    pub user_name: String,
    #[validate(length(min = 1))]
    pub confirmation_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordCommand {
    #[validate(email)]
    pub email: String,
    #[validate(regex(path = "CLIENT_KEY_REGEX", message = "Client key is invalid"))]
    pub client_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordCommand {
    #[validate(length(min = 1))]
    pub user_name: String,
    #[validate(length(min = 6))]
    pub new_password: String,
    #[validate(length(min = 1))]
    pub confirmation_token: String,
}

impl Command for RegisterUserCommand {}
impl Command for CreatePasswordCommand {}
impl Command for ConfirmEmailCommand {}
impl Command for ForgotPasswordCommand {}
impl Command for ResetPasswordCommand {}
