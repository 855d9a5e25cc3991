//! Mailer trait and error types.

use async_trait::async_trait;

/// Errors that can occur while preparing or delivering an email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Email template error: {0}")]
    Template(String),
    #[error("Email delivery error: {0}")]
    Delivery(String),
}

impl From<askama::Error> for MailError {
    fn from(e: askama::Error) -> Self {
        MailError::Template(e.to_string())
    }
}

/// Result type for mailer operations.
pub type MailResult<T> = Result<T, MailError>;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait for delivering rendered emails.
///
/// # Implementations
///
/// - [`crate::infrastructure::mailer::LogMailer`] - writes emails to the tracing log
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers one email.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Delivery`] if the backend rejects the message.
    async fn send(&self, email: &Email) -> MailResult<()>;
}
