//! Outbound email for resolution notices.
//!
//! The service only needs "send this, tell me if it failed". Transports sit
//! behind [`Mailer`] so the HTTP layer can hold any of them as
//! `Arc<dyn Mailer>`.

pub mod http;
pub mod logging;

use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

use dcw_types::models::Category;

pub use http::HttpMailer;
pub use logging::LogMailer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    /// Message sent to a student once their complaint is resolved. An admin
    /// note, if any, follows the fixed first line.
    pub fn resolution(to: &str, category: Category, note: Option<&str>) -> Self {
        let mut body = format!("Your complaint '{category}' has been resolved. Thank you!");
        if let Some(note) = note {
            body.push_str("\n\nResolution note: ");
            body.push_str(note);
        }
        Self {
            to: to.to_string(),
            subject: "Complaint Resolved".to_string(),
            body,
        }
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected the message with status {0}")]
    Rejected(u16),

    #[error("mail send timed out after {0:?}")]
    Timeout(Duration),
}

/// A way of delivering [`Email`]. Sends are best-effort; callers decide what
/// a failure means.
pub trait Mailer: Send + Sync {
    fn send<'a>(&'a self, email: &'a Email) -> BoxFuture<'a, Result<(), MailError>>;
}
