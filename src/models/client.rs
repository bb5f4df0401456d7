use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::kernel::{Entity, Finder, StoreError};

crate::typed_identity!(
    /// Identifier of a [`Client`] registration document.
    ClientId
);

/// Redirect uri value that accepts any redirect.
pub const ANY_REDIRECT_URI: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationType {
    JavaScript,
    NativeConfidential,
}

/// An application registered to use the account endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    /// Public key the application presents, e.g. `"todoflowWeb"`.
    client_id: String,
    client_secret: String,
    name: String,
    application_type: ApplicationType,
    active: bool,
    allowed_origin: String,
    redirect_uri: String,
    logout_redirect_uri: String,
    confirmation_uri: String,
}

/// Attributes of a new registration.
#[derive(Debug, Clone)]
pub struct ClientRegistration {
    pub client_id: String,
    pub client_secret: String,
    pub name: String,
    pub application_type: ApplicationType,
    pub active: bool,
    pub allowed_origin: String,
    pub redirect_uri: String,
    pub logout_redirect_uri: String,
    pub confirmation_uri: String,
}

impl Client {
    pub fn new(id: ClientId, registration: ClientRegistration) -> Self {
        Self {
            id,
            client_id: registration.client_id,
            client_secret: registration.client_secret,
            name: registration.name,
            application_type: registration.application_type,
            active: registration.active,
            allowed_origin: registration.allowed_origin,
            redirect_uri: registration.redirect_uri,
            logout_redirect_uri: registration.logout_redirect_uri,
            confirmation_uri: registration.confirmation_uri,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn application_type(&self) -> ApplicationType {
        self.application_type
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn logout_redirect_uri(&self) -> &str {
        &self.logout_redirect_uri
    }

    pub fn confirmation_uri(&self) -> &str {
        &self.confirmation_uri
    }

    /// True when `uri` matches the registered redirect uri, or any uri is allowed.
    pub fn accepts_redirect(&self, uri: &str) -> bool {
        self.redirect_uri == ANY_REDIRECT_URI || self.redirect_uri == uri
    }
}

impl Entity for Client {
    type Id = ClientId;
    #[allow(clippy::type_complexity)]
    type Key<'a> = (
        &'a ClientId,
        &'a str,
        &'a str,
        &'a str,
        ApplicationType,
        bool,
        &'a str,
        &'a str,
        &'a str,
        &'a str,
    );

    fn id(&self) -> &ClientId {
        &self.id
    }

    // Registrations compare on every attribute.
    fn identity_key(&self) -> Self::Key<'_> {
        (
            &self.id,
            &self.client_id,
            &self.client_secret,
            &self.name,
            self.application_type,
            self.active,
            &self.allowed_origin,
            &self.redirect_uri,
            &self.logout_redirect_uri,
            &self.confirmation_uri,
        )
    }
}

crate::entity_equality!(Client);

#[async_trait]
pub trait ClientFinder: Finder<Client> {
    /// Looks a registration up by the public key the application presents.
    async fn get_by_client_id(
        &self,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Client>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(redirect_uri: &str) -> ClientRegistration {
        ClientRegistration {
            client_id: "todoflowWeb".to_string(),
            client_secret: "secret".to_string(),
            name: "Todoflow web".to_string(),
            application_type: ApplicationType::JavaScript,
            active: true,
            allowed_origin: "*".to_string(),
            redirect_uri: redirect_uri.to_string(),
            logout_redirect_uri: "http://localhost:5000".to_string(),
            confirmation_uri: "http://localhost:5000/confirm".to_string(),
        }
    }

    #[test]
    fn test_redirect_uri_must_match_unless_wildcard() {
        let id = ClientId::new("c-1").unwrap();
        let strict = Client::new(id.clone(), registration("http://localhost:5000"));
        assert!(strict.accepts_redirect("http://localhost:5000"));
        assert!(!strict.accepts_redirect("http://evil.example"));

        let open = Client::new(id, registration("*"));
        assert!(open.accepts_redirect("http://anything.example"));
    }

    #[test]
    fn test_clients_compare_on_every_attribute() {
        let id = ClientId::new("c-1").unwrap();
        let a = Client::new(id.clone(), registration("http://localhost:5000"));
        let b = Client::new(id.clone(), registration("http://localhost:5000"));
        assert_eq!(a, b);

        let mut inactive = registration("http://localhost:5000");
        inactive.active = false;
        assert_ne!(a, Client::new(id, inactive));
    }

    #[test]
    fn test_document_uses_string_application_type() {
        let client = Client::new(ClientId::new("c-1").unwrap(), registration("*"));
        let document = serde_json::to_value(&client).unwrap();
        assert_eq!(document["application_type"], "JavaScript");
        assert_eq!(document["client_id"], "todoflowWeb");
    }
}
