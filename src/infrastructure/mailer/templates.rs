//! Transactional email templates.

use askama::Template;

use super::service::{Email, MailResult};

/// Welcome email sent after registration, carrying the activation token.
///
/// Renders `templates/user_welcome.txt`.
#[derive(Template)]
#[template(path = "user_welcome.txt")]
pub struct WelcomeEmail<'a> {
    pub username: &'a str,
    pub user_id: i64,
    pub activation_token: &'a str,
}

impl WelcomeEmail<'_> {
    pub const SUBJECT: &'static str = "Welcome to the Quote of the Day API!";

    /// Renders the email addressed to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`super::MailError::Template`] if rendering fails.
    pub fn to_email(&self, to: &str) -> MailResult<Email> {
        Ok(Email {
            to: to.to_string(),
            subject: Self::SUBJECT.to_string(),
            body: self.render()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_email_contains_token() {
        let email = WelcomeEmail {
            username: "alice",
            user_id: 42,
            activation_token: "IEYZQUBEMPPAKPOAWTPV6YJ6RM",
        }
        .to_email("alice@example.com")
        .unwrap();

        assert_eq!(email.to, "alice@example.com");
        assert_eq!(email.subject, WelcomeEmail::SUBJECT);
        assert!(email.body.contains("IEYZQUBEMPPAKPOAWTPV6YJ6RM"));
        assert!(email.body.contains("alice"));
        assert!(email.body.contains("42"));
    }
}
