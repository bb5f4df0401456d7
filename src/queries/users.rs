use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cqs::Query;
use crate::kernel::{Entity, Outcome};
use crate::models::{User, UserInfoResult, UserResult};

#[derive(Debug, Clone, Deserialize)]
pub struct UserByNameQuery {
    pub user_name: String,
}

impl Query for UserByNameQuery {
    type Output = Option<UserResult>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfoQuery {
    pub id: String,
}

impl Query for UserInfoQuery {
    type Output = Option<UserInfoResult>;
}

/// Checks a user name and password pair.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserNamePasswordLoginQuery {
    #[validate(length(min = 1))]
    pub user_name: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl Query for UserNamePasswordLoginQuery {
    type Output = LoginResult;
}

/// Message of a rejected login. Does not reveal which half was wrong.
pub const INVALID_LOGIN: &str = "Invalid user name or password.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResult {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl LoginResult {
    pub fn rejected() -> Self {
        Self {
            outcome: Outcome::fail(INVALID_LOGIN),
            user_id: None,
            user_name: None,
        }
    }

    pub fn accepted(user: &User) -> Self {
        Self {
            outcome: Outcome::ok(),
            user_id: Some(user.id().to_string()),
            user_name: Some(user.user_name().to_string()),
        }
    }
}
