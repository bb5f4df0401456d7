use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::document::DocumentCollection;
use crate::auth::{PasswordHasher, TokenIssuer, TokenPurpose};
use crate::kernel::{Entity, StoreError};
use crate::models::{IdentityResult, MembershipError, User, UserId, UserManager};

pub const DUPLICATE_USER_NAME: &str = "DuplicateUserName";
pub const USER_ALREADY_HAS_PASSWORD: &str = "UserAlreadyHasPassword";
pub const INVALID_TOKEN: &str = "InvalidToken";
pub const USER_NOT_FOUND: &str = "UserNotFound";

/// [`UserManager`] over a document collection, hashing with bcrypt and
/// issuing signed one-time tokens.
pub struct DocumentUserManager {
    users: Arc<dyn DocumentCollection>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl DocumentUserManager {
    pub fn new(
        users: Arc<dyn DocumentCollection>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    async fn find_by_field(
        &self,
        field: &str,
        value: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, MembershipError> {
        match self.users.find_one_by(field, value, cancel).await? {
            Some(document) => Ok(Some(
                serde_json::from_value(document).map_err(StoreError::from)?,
            )),
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError> {
        let document = serde_json::to_value(user).map_err(StoreError::from)?;
        if self.users.replace_one(user.id().as_str(), document, cancel).await? {
            Ok(IdentityResult::success())
        } else {
            Ok(IdentityResult::failed([USER_NOT_FOUND]))
        }
    }
}

#[async_trait]
impl UserManager for DocumentUserManager {
    async fn find_by_id(
        &self,
        id: &UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, MembershipError> {
        match self.users.find_one(id.as_str(), cancel).await? {
            Some(document) => Ok(Some(
                serde_json::from_value(document).map_err(StoreError::from)?,
            )),
            None => Ok(None),
        }
    }

    async fn find_by_name(
        &self,
        user_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, MembershipError> {
        self.find_by_field("user_name", user_name, cancel).await
    }

    async fn find_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, MembershipError> {
        self.find_by_field("email", email, cancel).await
    }

    async fn create(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError> {
        if self.find_by_name(user.user_name(), cancel).await?.is_some() {
            return Ok(IdentityResult::failed([DUPLICATE_USER_NAME]));
        }
        let document = serde_json::to_value(user).map_err(StoreError::from)?;
        match self.users.insert_one(user.id().as_str(), document, cancel).await {
            Ok(()) => {
                info!("Created user {}", user.user_name());
                Ok(IdentityResult::success())
            }
            Err(StoreError::Duplicate(_)) => Ok(IdentityResult::failed([DUPLICATE_USER_NAME])),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError> {
        if self.users.delete_one(user.id().as_str(), cancel).await? {
            info!("Deleted user {}", user.user_name());
            Ok(IdentityResult::success())
        } else {
            Ok(IdentityResult::failed([USER_NOT_FOUND]))
        }
    }

    async fn add_password(
        &self,
        user: &User,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError> {
        if user.has_password() {
            return Ok(IdentityResult::failed([USER_ALREADY_HAS_PASSWORD]));
        }
        let mut user = user.clone();
        user.set_password_hash(self.hasher.hash_password(password)?);
        self.save(&user, cancel).await
    }

    async fn check_password(&self, user: &User, password: &str) -> Result<bool, MembershipError> {
        match user.password_hash() {
            Some(hash) => Ok(self.hasher.verify_password(password, hash)?),
            None => Ok(false),
        }
    }

    async fn generate_email_confirmation_token(
        &self,
        user: &User,
    ) -> Result<String, MembershipError> {
        Ok(self.tokens.issue(user, TokenPurpose::EmailConfirmation)?)
    }

    async fn confirm_email(
        &self,
        user: &User,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError> {
        if !self.tokens.verify(token, user, TokenPurpose::EmailConfirmation) {
            warn!("Rejected email confirmation token for {}", user.user_name());
            return Ok(IdentityResult::failed([INVALID_TOKEN]));
        }
        let mut user = user.clone();
        user.confirm_email();
        self.save(&user, cancel).await
    }

    async fn generate_password_reset_token(
        &self,
        user: &User,
    ) -> Result<String, MembershipError> {
        Ok(self.tokens.issue(user, TokenPurpose::ResetPassword)?)
    }

    async fn reset_password(
        &self,
        user: &User,
        token: &str,
        new_password: &str,
        cancel: &CancellationToken,
    ) -> Result<IdentityResult, MembershipError> {
        if !self.tokens.verify(token, user, TokenPurpose::ResetPassword) {
            warn!("Rejected password reset token for {}", user.user_name());
            return Ok(IdentityResult::failed([INVALID_TOKEN]));
        }
        let mut user = user.clone();
        user.set_password_hash(self.hasher.hash_password(new_password)?);
        self.save(&user, cancel).await
    }
}
