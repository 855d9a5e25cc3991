//! Outbound email.
//!
//! - [`service`] - [`Mailer`] trait and error types
//! - [`templates`] - askama templates for transactional emails
//! - [`log_mailer`] - [`LogMailer`], writes emails to the log instead of sending them
//! - [`send_in_background`] - fire-and-forget delivery with retry

pub mod log_mailer;
pub mod service;
pub mod templates;

pub use log_mailer::LogMailer;
pub use service::{Email, MailError, MailResult, Mailer};

use std::sync::Arc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Maximum delivery attempts for one email.
const MAX_ATTEMPTS: usize = 3;

/// Delivers `email` on a background task, retrying with exponential backoff.
///
/// Failures after the last attempt are logged and dropped; the request that
/// triggered the email has already been answered.
pub fn send_in_background(mailer: Arc<dyn Mailer>, email: Email) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let strategy = ExponentialBackoff::from_millis(100)
            .map(jitter)
            .take(MAX_ATTEMPTS - 1);

        let result = Retry::spawn(strategy, || {
            let mailer = mailer.clone();
            let email = email.clone();
            async move { mailer.send(&email).await }
        })
        .await;

        if let Err(e) = result {
            tracing::error!(recipient = %email.to, subject = %email.subject, error = %e, "Email delivery failed");
        }
    })
}
