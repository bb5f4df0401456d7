use serde::{Deserialize, Serialize};

use crate::cqs::Query;
use crate::kernel::{Entity, Outcome};
use crate::models::Client;

/// Checks that a client key is registered and active.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateClientQuery {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl Query for ValidateClientQuery {
    type Output = ValidateClientResult;
}

/// Checks that `redirect_uri` is allowed for the client registered under `client_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateClientRedirectUriQuery {
    pub client_id: String,
    pub redirect_uri: String,
}

impl Query for ValidateClientRedirectUriQuery {
    type Output = Outcome;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateClientResult {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

impl ValidateClientResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::fail(error),
            id: None,
            name: None,
            allowed_origin: None,
            redirect_uri: None,
        }
    }
}

impl From<&Client> for ValidateClientResult {
    fn from(client: &Client) -> Self {
        Self {
            outcome: Outcome::ok(),
            id: Some(client.id().to_string()),
            name: Some(client.name().to_string()),
            allowed_origin: Some(client.allowed_origin().to_string()),
            redirect_uri: Some(client.redirect_uri().to_string()),
        }
    }
}
