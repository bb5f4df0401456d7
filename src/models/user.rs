use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kernel::{Entity, HasHistory, History, Identity};

crate::typed_identity!(
    /// Identifier of a [`User`].
    UserId
);

/// A registered account. The user name is the email address the account
/// was registered with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    user_name: String,
    email: String,
    email_confirmed: bool,
    password_hash: Option<String>,
    /// Rotated whenever credentials change; tokens issued before a rotation
    /// stop validating.
    security_stamp: String,
    #[serde(flatten)]
    history: History,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        let email = email.into();
        let mut user = Self {
            id,
            user_name: email.clone(),
            email,
            email_confirmed: false,
            password_hash: None,
            security_stamp: Identity::generate().to_string(),
            history: History::default(),
        };
        user.set_as_created();
        user
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn email_confirmed(&self) -> bool {
        self.email_confirmed
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn security_stamp(&self) -> &str {
        &self.security_stamp
    }

    pub fn confirm_email(&mut self) {
        self.email_confirmed = true;
        self.set_as_modified();
    }

    /// Stores a new password hash and rotates the security stamp.
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = Some(hash);
        self.security_stamp = Identity::generate().to_string();
        self.set_as_modified();
    }
}

impl Entity for User {
    type Id = UserId;
    type Key<'a> = &'a UserId;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn identity_key(&self) -> Self::Key<'_> {
        &self.id
    }
}

crate::entity_equality!(User);

impl HasHistory for User {
    fn history(&self) -> &History {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }
}

/// Account summary returned by user lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResult {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub has_password: bool,
}

impl From<&User> for UserResult {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            user_name: user.user_name().to_string(),
            email: user.email().to_string(),
            email_confirmed: user.email_confirmed(),
            has_password: user.has_password(),
        }
    }
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfoResult {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub created: Option<DateTime<Utc>>,
}

impl From<&User> for UserInfoResult {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            user_name: user.user_name().to_string(),
            email: user.email().to_string(),
            created: user.created(),
        }
    }
}
