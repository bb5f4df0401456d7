use async_trait::async_trait;
use log::warn;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::cqs::{HandlerError, QueryHandler};
use crate::kernel::{Failure, Finder, Outcome};
use crate::models::{Client, ClientFinder, ClientId};
use crate::queries::{ValidateClientQuery, ValidateClientRedirectUriQuery, ValidateClientResult};

pub const CLIENT_INACTIVE: &str = "Client is inactive.";

pub fn client_not_registered(client_id: &str) -> String {
    format!("Client '{}' is not registered in the system.", client_id)
}

/// Looks up the client registered under `client_key`, failing when there is none.
pub(crate) async fn registered_client(
    clients: &dyn ClientFinder,
    client_key: &str,
    cancel: &CancellationToken,
) -> Result<Client, HandlerError> {
    clients
        .get_by_client_id(client_key, cancel)
        .await?
        .ok_or_else(|| Failure::new(client_not_registered(client_key)).into())
}

pub struct ClientQueryHandler {
    clients: Arc<dyn ClientFinder>,
}

impl ClientQueryHandler {
    pub fn new(clients: Arc<dyn ClientFinder>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl QueryHandler<ValidateClientQuery> for ClientQueryHandler {
    async fn execute(
        &self,
        query: ValidateClientQuery,
        cancel: CancellationToken,
    ) -> Result<ValidateClientResult, HandlerError> {
        let Some(client) = self
            .clients
            .get_by_client_id(&query.client_id, &cancel)
            .await?
        else {
            warn!("Unknown client {}", query.client_id);
            return Ok(ValidateClientResult::failed(client_not_registered(
                &query.client_id,
            )));
        };

        if !client.is_active() {
            return Ok(ValidateClientResult::failed(CLIENT_INACTIVE));
        }
        Ok(ValidateClientResult::from(&client))
    }
}

#[async_trait]
impl QueryHandler<ValidateClientRedirectUriQuery> for ClientQueryHandler {
    async fn execute(
        &self,
        query: ValidateClientRedirectUriQuery,
        cancel: CancellationToken,
    ) -> Result<Outcome, HandlerError> {
        // Looked up by registration id, not by client key.
        let client = match ClientId::new(query.client_id.as_str()) {
            Ok(id) => self.clients.get_by_id(&id, &cancel).await?,
            Err(_) => None,
        };
        let Some(client) = client else {
            return Ok(Outcome::fail(client_not_registered(&query.client_id)));
        };

        if !client.accepts_redirect(&query.redirect_uri) {
            warn!(
                "Rejected redirect uri {} for client {}",
                query.redirect_uri, query.client_id
            );
            return Ok(Outcome::fail(format!(
                "Invalid redirect uri '{}' for client '{}'",
                query.redirect_uri, query.client_id
            )));
        }
        if !client.is_active() {
            return Ok(Outcome::fail(CLIENT_INACTIVE));
        }
        Ok(Outcome::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicationType, ClientRegistration};
    use crate::store::{DocumentClientStore, DocumentContext};
    use pretty_assertions::assert_eq;

    fn registration(client_id: &str, active: bool, redirect_uri: &str) -> ClientRegistration {
        ClientRegistration {
            client_id: client_id.to_string(),
            client_secret: "secret".to_string(),
            name: format!("{} app", client_id),
            application_type: ApplicationType::JavaScript,
            active,
            allowed_origin: "http://localhost:5000".to_string(),
            redirect_uri: redirect_uri.to_string(),
            logout_redirect_uri: "http://localhost:5000".to_string(),
            confirmation_uri: "http://localhost:5000/confirm".to_string(),
        }
    }

    async fn handler_with(clients: Vec<(&str, ClientRegistration)>) -> ClientQueryHandler {
        let store: DocumentClientStore = DocumentContext::in_memory().client_store();
        for (id, registration) in clients {
            let client = Client::new(ClientId::new(id).unwrap(), registration);
            store
                .insert(&client, &CancellationToken::new())
                .await
                .unwrap();
        }
        ClientQueryHandler::new(Arc::new(store))
    }

    fn validate(client_id: &str) -> ValidateClientQuery {
        ValidateClientQuery {
            client_id: client_id.to_string(),
            client_secret: None,
        }
    }

    fn redirect(client_id: &str, uri: &str) -> ValidateClientRedirectUriQuery {
        ValidateClientRedirectUriQuery {
            client_id: client_id.to_string(),
            redirect_uri: uri.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_validate_active_client() {
        let handler = handler_with(vec![(
            "c-1",
            registration("web", true, "http://localhost:5000"),
        )])
        .await;

        let result = handler
            .execute(validate("web"), CancellationToken::new())
            .await
            .unwrap();
        assert!(result.outcome.succeeded());
        assert_eq!(result.id.as_deref(), Some("c-1"));
        assert_eq!(result.name.as_deref(), Some("web app"));
        assert_eq!(result.redirect_uri.as_deref(), Some("http://localhost:5000"));
    }

    #[actix_rt::test]
    async fn test_validate_unknown_and_inactive_clients() {
        let handler = handler_with(vec![(
            "c-1",
            registration("legacy", false, "http://localhost:5000"),
        )])
        .await;

        let unknown = handler
            .execute(validate("nobody"), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            unknown.outcome.errors(),
            ["Client 'nobody' is not registered in the system."]
        );

        let inactive = handler
            .execute(validate("legacy"), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(inactive.outcome.errors(), [CLIENT_INACTIVE]);
        assert!(inactive.id.is_none());
    }

    #[actix_rt::test]
    async fn test_redirect_uri_checks() {
        let handler = handler_with(vec![
            ("c-1", registration("web", true, "http://localhost:5000")),
            ("c-2", registration("any", true, "*")),
            ("c-3", registration("off", false, "http://localhost:5000")),
        ])
        .await;
        let run = |query: ValidateClientRedirectUriQuery| {
            handler.execute(query, CancellationToken::new())
        };

        assert!(run(redirect("c-1", "http://localhost:5000"))
            .await
            .unwrap()
            .succeeded());
        assert!(run(redirect("c-2", "http://elsewhere.example"))
            .await
            .unwrap()
            .succeeded());

        let mismatch = run(redirect("c-1", "http://evil.example")).await.unwrap();
        assert_eq!(
            mismatch.errors(),
            ["Invalid redirect uri 'http://evil.example' for client 'c-1'"]
        );

        let inactive = run(redirect("c-3", "http://localhost:5000")).await.unwrap();
        assert_eq!(inactive.errors(), [CLIENT_INACTIVE]);

        let unknown = run(redirect("c-9", "http://localhost:5000")).await.unwrap();
        assert_eq!(
            unknown.errors(),
            ["Client 'c-9' is not registered in the system."]
        );
    }
}
