use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Serialize;
use tracing::debug;

use crate::{Email, MailError, Mailer};

/// Delivers mail through an HTTP relay that accepts
/// `POST {from, to, subject, text}` as JSON and answers 2xx on acceptance.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            from: from.into(),
        })
    }
}

impl Mailer for HttpMailer {
    fn send<'a>(&'a self, email: &'a Email) -> BoxFuture<'a, Result<(), MailError>> {
        Box::pin(async move {
            let message = RelayMessage {
                from: &self.from,
                to: &email.to,
                subject: &email.subject,
                text: &email.body,
            };

            let mut request = self.client.post(&self.endpoint).json(&message);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(MailError::Rejected(status.as_u16()));
            }

            debug!(to = %email.to, %status, "Email accepted by relay");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use tokio::sync::mpsc;

    use super::*;
    use dcw_types::models::Category;

    /// Authorization header and JSON body of one request to the relay.
    type Received = (Option<String>, serde_json::Value);

    async fn spawn_relay(reply: StatusCode) -> (String, mpsc::UnboundedReceiver<Received>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/send",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let tx = tx.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let _ = tx.send((auth, body));
                    reply
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/send"), rx)
    }

    #[tokio::test]
    async fn posts_message_to_relay() {
        let (endpoint, mut rx) = spawn_relay(StatusCode::ACCEPTED).await;
        let mailer = HttpMailer::new(
            endpoint,
            Some("key-123".into()),
            "no-reply@dcw.test",
            Duration::from_secs(5),
        )
        .unwrap();

        let email = Email::resolution("bob@example.com", Category::Hostel, None);
        mailer.send(&email).await.unwrap();

        let (auth, body) = rx.recv().await.unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer key-123"));
        assert_eq!(body["from"], "no-reply@dcw.test");
        assert_eq!(body["to"], "bob@example.com");
        assert_eq!(body["subject"], "Complaint Resolved");
        assert_eq!(body["text"], "Your complaint 'Hostel' has been resolved. Thank you!");
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let (endpoint, _rx) = spawn_relay(StatusCode::SERVICE_UNAVAILABLE).await;
        let mailer =
            HttpMailer::new(endpoint, None, "no-reply@dcw.test", Duration::from_secs(5)).unwrap();

        let err = mailer
            .send(&Email::resolution("bob@example.com", Category::Lab, None))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Rejected(503)));
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mailer = HttpMailer::new(
            format!("http://{addr}/send"),
            None,
            "no-reply@dcw.test",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = mailer
            .send(&Email::resolution("bob@example.com", Category::Lab, None))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Transport(_)));
    }
}
