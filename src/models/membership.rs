//! Contracts of the identity provider and mail service that the account flows
//! are written against.

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::user::{User, UserId};
use crate::kernel::{Outcome, StoreError};

/// Success flag plus identity error codes, as reported by a [`UserManager`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityResult {
    succeeded: bool,
    errors: Vec<String>,
}

impl IdentityResult {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
        }
    }

    pub fn failed<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            succeeded: false,
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_outcome(self) -> Outcome {
        if self.succeeded {
            Outcome::ok()
        } else {
            Outcome::fail_all(self.errors)
        }
    }
}

/// Errors raised by the identity provider itself, as opposed to rejections
/// reported through [`IdentityResult`].
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("failed to issue token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Account storage, password checks and one-time tokens.
#[async_trait]
pub trait UserManager: Send + Sync {
    async fn find_by_id(
        &self,
        id: &UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, MembershipError>;

    async fn find_by_name(
        &self,
        user_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, MembershipError>;

    async fn find_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, MembershipError>;

    /// Stores a new account. Duplicate user names are reported as a failed result.
    async fn create(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError>;

    /// Removes an account. A missing account is reported as a failed result.
    async fn delete(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError>;

    /// Sets the first password of an account that has none.
    async fn add_password(
        &self,
        user: &User,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError>;

    async fn check_password(&self, user: &User, password: &str) -> Result<bool, MembershipError>;

    fn is_email_confirmed(&self, user: &User) -> bool {
        user.email_confirmed()
    }

    async fn generate_email_confirmation_token(
        &self,
        user: &User,
    ) -> Result<String, MembershipError>;

    async fn confirm_email(
        &self,
        user: &User,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError>;

    async fn generate_password_reset_token(&self, user: &User)
        -> Result<String, MembershipError>;

    async fn reset_password(
        &self,
        user: &User,
        token: &str,
        new_password: &str,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail service rejected the message with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}
