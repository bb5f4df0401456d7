use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::Url;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::clients::registered_client;
use crate::commands::{
    ConfirmEmailCommand, CreatePasswordCommand, ForgotPasswordCommand, RegisterUserCommand,
    ResetPasswordCommand,
};
use crate::cqs::{CommandHandler, HandlerError, QueryHandler};
use crate::kernel::{Failure, Outcome};
use crate::models::{
    Client, ClientFinder, EmailSender, User, UserId, UserInfoResult, UserManager, UserResult,
};
use crate::queries::{LoginResult, UserByNameQuery, UserInfoQuery, UserNamePasswordLoginQuery};

pub const CONFIRM_EMAIL_FAILED: &str = "Could not confirm user email";
pub const FORGOT_PASSWORD_FAILED: &str = "Could not reset user password";
pub const RESET_PASSWORD_FAILED: &str = "Could not reset password";
pub const CREATE_PASSWORD_FAILED: &str = "Could not change user password.";

/// What a link sent by email asks the client application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationMode {
    ConfirmEmail,
    ResetPassword,
}

impl ConfirmationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationMode::ConfirmEmail => "confirmEmail",
            ConfirmationMode::ResetPassword => "resetPassword",
        }
    }
}

/// Builds the link to the client's confirmation page carrying `token`.
pub fn callback_url(
    confirmation_uri: &str,
    user_name: &str,
    token: &str,
    mode: ConfirmationMode,
) -> Result<Url, Failure> {
    let base = confirmation_uri.trim_end_matches('/');
    Url::parse_with_params(
        base,
        &[
            ("userName", user_name),
            ("confirmationToken", token),
            ("confirmationMode", mode.as_str()),
        ],
    )
    .map_err(|e| {
        Failure::new(format!(
            "Client confirmation uri '{}' is invalid: {}",
            confirmation_uri, e
        ))
    })
}

/// Handles registration, email confirmation and password flows.
pub struct UserCommandHandler {
    users: Arc<dyn UserManager>,
    email: Arc<dyn EmailSender>,
    clients: Arc<dyn ClientFinder>,
}

impl UserCommandHandler {
    pub fn new(
        users: Arc<dyn UserManager>,
        email: Arc<dyn EmailSender>,
        clients: Arc<dyn ClientFinder>,
    ) -> Self {
        Self {
            users,
            email,
            clients,
        }
    }

    async fn send_email_confirmation(
        &self,
        user: &User,
        client: &Client,
    ) -> Result<(), HandlerError> {
        let token = self.users.generate_email_confirmation_token(user).await?;
        let url = callback_url(
            client.confirmation_uri(),
            user.user_name(),
            &token,
            ConfirmationMode::ConfirmEmail,
        )?;
        self.email
            .send_email(
                user.email(),
                "Confirm your account",
                &format!("Please confirm your account by clicking this link: {}", url),
            )
            .await?;
        Ok(())
    }

    async fn send_reset_password_request(
        &self,
        user: &User,
        client: &Client,
    ) -> Result<(), HandlerError> {
        let token = self.users.generate_password_reset_token(user).await?;
        let url = callback_url(
            client.confirmation_uri(),
            user.user_name(),
            &token,
            ConfirmationMode::ResetPassword,
        )?;
        self.email
            .send_email(
                user.email(),
                "Reset your password",
                &format!(
                    "Please reset your account password by clicking this link: {}",
                    url
                ),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CommandHandler<RegisterUserCommand, Outcome> for UserCommandHandler {
    async fn handle(
        &self,
        command: RegisterUserCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let client = registered_client(self.clients.as_ref(), &command.client_key, &cancel).await?;

        let user = User::new(UserId::generate(), command.email);
        let result = self.users.create(&user, &cancel).await?;
        if !result.succeeded() {
            warn!("Registration of {} refused: {:?}", user.user_name(), result.errors());
            return Ok(result.into_outcome());
        }

        // Without the link the account could never be confirmed, so it is
        // removed and the registration can be retried.
        if let Err(e) = self.send_email_confirmation(&user, &client).await {
            error!("Confirmation email to {} failed: {}", user.user_name(), e);
            self.users.delete(&user, &cancel).await?;
            return Err(e);
        }
        info!("Registered {} through {}", user.user_name(), client.client_id());
        Ok(Outcome::ok())
    }
}

#[async_trait]
impl CommandHandler<CreatePasswordCommand, Outcome> for UserCommandHandler {
    async fn handle(
        &self,
        command: CreatePasswordCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let user = self
            .users
            .find_by_name(&command.user_name, &cancel)
            .await?
            .ok_or_else(|| Failure::new(CREATE_PASSWORD_FAILED))?;

        let result = self
            .users
            .add_password(&user, &command.password, &cancel)
            .await?;
        if let Some(first) = result.errors().first() {
            return Err(Failure::new(first.clone()).into());
        }
        Ok(result.into_outcome())
    }
}

#[async_trait]
impl CommandHandler<ConfirmEmailCommand, Outcome> for UserCommandHandler {
    async fn handle(
        &self,
        command: ConfirmEmailCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let Some(user) = self.users.find_by_name(&command.user_name, &cancel).await? else {
            return Ok(Outcome::fail(CONFIRM_EMAIL_FAILED));
        };

        let result = self
            .users
            .confirm_email(&user, &command.confirmation_token, &cancel)
            .await?;
        if !result.succeeded() {
            warn!("Email confirmation of {} refused", user.user_name());
            return Ok(Outcome::fail(CONFIRM_EMAIL_FAILED));
        }
        Ok(Outcome::ok())
    }
}

#[async_trait]
impl CommandHandler<ForgotPasswordCommand, Outcome> for UserCommandHandler {
    async fn handle(
        &self,
        command: ForgotPasswordCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let user = match self.users.find_by_email(&command.email, &cancel).await? {
            Some(user) if self.users.is_email_confirmed(&user) => user,
            _ => return Err(Failure::new(FORGOT_PASSWORD_FAILED).into()),
        };
        let client = registered_client(self.clients.as_ref(), &command.client_id, &cancel).await?;

        self.send_reset_password_request(&user, &client).await?;
        Ok(Outcome::ok())
    }
}

#[async_trait]
impl CommandHandler<ResetPasswordCommand, Outcome> for UserCommandHandler {
    async fn handle(
        &self,
        command: ResetPasswordCommand,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        let Some(user) = self.users.find_by_name(&command.user_name, &cancel).await? else {
            return Ok(Outcome::fail(RESET_PASSWORD_FAILED));
        };

        let result = self
            .users
            .reset_password(
                &user,
                &command.confirmation_token,
                &command.new_password,
                &cancel,
            )
            .await?;
        if !result.succeeded() {
            return Ok(Outcome::fail(RESET_PASSWORD_FAILED));
        }
        Ok(Outcome::ok())
    }
}

pub struct UserQueryHandler {
    users: Arc<dyn UserManager>,
}

impl UserQueryHandler {
    pub fn new(users: Arc<dyn UserManager>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl QueryHandler<UserByNameQuery> for UserQueryHandler {
    async fn execute(
        &self,
        query: UserByNameQuery,
        cancel: CancellationToken,
    ) -> Result<Option<UserResult>, HandlerError> {
        let user = self.users.find_by_name(&query.user_name, &cancel).await?;
        Ok(user.as_ref().map(UserResult::from))
    }
}

#[async_trait]
impl QueryHandler<UserInfoQuery> for UserQueryHandler {
    async fn execute(
        &self,
        query: UserInfoQuery,
        cancel: CancellationToken,
    ) -> Result<Option<UserInfoResult>, HandlerError> {
        let Ok(id) = UserId::new(query.id) else {
            return Ok(None);
        };
        let user = self.users.find_by_id(&id, &cancel).await?;
        Ok(user.as_ref().map(UserInfoResult::from))
    }
}

#[async_trait]
impl QueryHandler<UserNamePasswordLoginQuery> for UserQueryHandler {
    async fn execute(
        &self,
        query: UserNamePasswordLoginQuery,
        cancel: CancellationToken,
    ) -> Result<LoginResult, HandlerError> {
        let Some(user) = self.users.find_by_name(&query.user_name, &cancel).await? else {
            return Ok(LoginResult::rejected());
        };

        if self.users.check_password(&user, &query.password).await? {
            Ok(LoginResult::accepted(&user))
        } else {
            Ok(LoginResult::rejected())
        }
    }
}
