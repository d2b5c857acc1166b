use futures_util::future::BoxFuture;
use tracing::info;

use crate::{Email, MailError, Mailer};

/// Used when no relay is configured: writes the message to the log instead
/// of delivering it.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send<'a>(&'a self, email: &'a Email) -> BoxFuture<'a, Result<(), MailError>> {
        Box::pin(async move {
            info!(
                to = %email.to,
                subject = %email.subject,
                body = %email.body,
                "Email (not delivered, no relay configured)"
            );
            Ok(())
        })
    }
}
