//! Account email delivery.

use async_trait::async_trait;
use log::{error, info};
use reqwest::Url;

use crate::config::{ConfigError, MailSettings};
use crate::models::{EmailError, EmailSender};

/// Posts each message as a form to an HTTP mail service using basic auth.
pub struct HttpEmailSender {
    client: reqwest::Client,
    endpoint: Url,
    user: String,
    password: Option<String>,
    from: String,
}

impl HttpEmailSender {
    pub fn new(settings: MailSettings) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(&settings.base_uri)
            .and_then(|base| base.join(&settings.request_uri))
            .map_err(|e| ConfigError::Invalid {
                name: "MAIL_BASE_URI",
                reason: e.to_string(),
            })?;

        // A key of the form "user:password" carries its own user name.
        let (user, password) = match settings.api_key.split_once(':') {
            Some((user, password)) => (user.to_string(), Some(password.to_string())),
            None => ("api".to_string(), Some(settings.api_key.clone())),
        };

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            user,
            password,
            from: settings.from,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.user, self.password.as_ref())
            .form(&[
                ("from", self.from.as_str()),
                ("to", to),
                ("subject", subject),
                ("text", body),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Mail service answered {} for message to {}", status, to);
            return Err(EmailError::Rejected(status.as_u16()));
        }
        info!("Sent '{}' to {}", subject, to);
        Ok(())
    }
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        info!("Email to {} ({}): {}", to, subject, body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_uri: &str, api_key: &str) -> MailSettings {
        MailSettings {
            base_uri: base_uri.to_string(),
            request_uri: "v3/example.com/messages".to_string(),
            api_key: api_key.to_string(),
            from: "no-reply@example.com".to_string(),
        }
    }

    #[test]
    fn test_endpoint_joins_base_and_request_uri() {
        let sender = HttpEmailSender::new(settings("https://mail.example/", "key-123")).unwrap();
        assert_eq!(
            sender.endpoint().as_str(),
            "https://mail.example/v3/example.com/messages"
        );
        assert_eq!(sender.user, "api");
        assert_eq!(sender.password.as_deref(), Some("key-123"));
    }

    #[test]
    fn test_api_key_may_carry_user_name() {
        let sender = HttpEmailSender::new(settings("https://mail.example/", "postmaster:pw"))
            .unwrap();
        assert_eq!(sender.user, "postmaster");
        assert_eq!(sender.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_invalid_base_uri_is_a_config_error() {
        let err = HttpEmailSender::new(settings("not a uri", "key")).err().unwrap();
        assert!(matches!(err, ConfigError::Invalid { name: "MAIL_BASE_URI", .. }));
    }

    #[actix_rt::test]
    async fn test_log_sender_always_succeeds() {
        assert!(LogEmailSender
            .send_email("jane@example.com", "Hello", "Body")
            .await
            .is_ok());
    }
}
