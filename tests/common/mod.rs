#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Duration;
use reqwest::Url;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use todoflow::auth::{PasswordHasher, TokenIssuer};
use todoflow::models::{EmailError, EmailSender};
use todoflow::store::{DocumentContext, DocumentUserManager};
use todoflow::{build_dispatch, Dependencies, Dispatch};

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingSender {
    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn last_recipient(&self) -> Option<String> {
        self.sent.lock().await.last().map(|(to, _, _)| to.clone())
    }

    /// The `confirmationToken` of the link in the last message.
    pub async fn last_token(&self) -> String {
        let sent = self.sent.lock().await;
        let (_, _, body) = sent.last().expect("an email was sent");
        let link = Url::parse(body.rsplit(' ').next().unwrap()).unwrap();
        link.query_pairs()
            .find(|(key, _)| key == "confirmationToken")
            .map(|(_, value)| value.into_owned())
            .unwrap()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        self.sent
            .lock()
            .await
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Wires the dispatch registries over fresh in-memory stores.
pub async fn in_memory_dispatch() -> (Dispatch, Arc<RecordingSender>) {
    let context = DocumentContext::in_memory();
    let clients = Arc::new(context.client_store());
    clients
        .seed_default_client(&CancellationToken::new())
        .await
        .unwrap();
    let users = Arc::new(DocumentUserManager::new(
        context.users.clone(),
        PasswordHasher::new(4),
        TokenIssuer::new("integration-tests", Duration::hours(1)),
    ));
    let outbox = Arc::new(RecordingSender::default());
    let todos = Arc::new(context.todo_store());

    let dispatch = build_dispatch(Dependencies {
        todo_finder: todos.clone(),
        todo_repository: todos,
        clients,
        users,
        email: outbox.clone(),
    })
    .unwrap();
    (dispatch, outbox)
}
