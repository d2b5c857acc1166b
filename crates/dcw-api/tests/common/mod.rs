#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use futures_util::future::BoxFuture;
use serde_json::Value;
use tower::ServiceExt;

use dcw_api::{AppState, AppStateInner, Settings, router};
use dcw_mail::{Email, MailError, Mailer};
use dcw_store::SecretHasher;

pub const ADMIN_PASSWORD: &str = "admin123";

/// Keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
}

impl Mailer for RecordingMailer {
    fn send<'a>(&'a self, email: &'a Email) -> BoxFuture<'a, Result<(), MailError>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        })
    }
}

/// Relay that always refuses.
pub struct FailingMailer;

impl Mailer for FailingMailer {
    fn send<'a>(&'a self, _email: &'a Email) -> BoxFuture<'a, Result<(), MailError>> {
        Box::pin(async { Err(MailError::Rejected(502)) })
    }
}

/// Relay that never answers.
pub struct HangingMailer;

impl Mailer for HangingMailer {
    fn send<'a>(&'a self, _email: &'a Email) -> BoxFuture<'a, Result<(), MailError>> {
        Box::pin(futures_util::future::pending())
    }
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

pub fn test_app(mailer: Arc<dyn Mailer>) -> TestApp {
    test_app_with_ttl(mailer, chrono::Duration::hours(1))
}

pub fn test_app_with_ttl(mailer: Arc<dyn Mailer>, token_ttl: chrono::Duration) -> TestApp {
    let settings = Settings {
        jwt_secret: "test-secret".into(),
        admin_password: ADMIN_PASSWORD.into(),
        seed_account: Some(("123".into(), "123".into())),
        token_ttl,
        mail_timeout: Duration::from_millis(200),
    };
    let hasher = SecretHasher::with_params(8, 1, 1).unwrap();
    let state = AppStateInner::build(settings, hasher, mailer).unwrap();
    TestApp {
        app: router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, token, body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PATCH", uri, token, body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(get_request(uri, token)).await
    }

    pub async fn student_token(&self, identifier: &str, secret: &str) -> String {
        let (status, _) = self
            .post(
                "/auth/register",
                None,
                serde_json::json!({ "identifier": identifier, "secret": secret }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .post(
                "/auth/login",
                None,
                serde_json::json!({ "identifier": identifier, "secret": secret }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .post("/admin/login", None, serde_json::json!({ "password": ADMIN_PASSWORD }))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
