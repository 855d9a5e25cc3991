//! Mailer that logs emails instead of sending them.

use super::service::{Email, MailResult, Mailer};
use async_trait::async_trait;
use tracing::{debug, info};

/// A mailer that writes every email to the log.
///
/// # Use Cases
///
/// - Development environments without an SMTP relay
/// - Testing scenarios where activation tokens are read from logs
pub struct LogMailer {
    sender: String,
}

impl LogMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> MailResult<()> {
        info!(
            from = %self.sender,
            to = %email.to,
            subject = %email.subject,
            "Email sent (log only)"
        );
        debug!(body = %email.body, "Email body");
        Ok(())
    }
}
