//! Registration and activation.

use serde_json::json;
use std::sync::Arc;

use super::auth_service::{AuthService, activation_token_ttl};
use crate::domain::entities::{NewUser, QUOTES_READ, TokenScope, User};
use crate::domain::repositories::{PermissionRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::mailer::templates::WelcomeEmail;
use crate::infrastructure::mailer::{Mailer, send_in_background};
use crate::utils::password::hash_password;

/// Permission granted to every newly registered user.
pub const DEFAULT_PERMISSION: &str = QUOTES_READ;

/// Service for user registration and account activation.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    permissions: Arc<dyn PermissionRepository>,
    auth_service: Arc<AuthService>,
    mailer: Arc<dyn Mailer>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        permissions: Arc<dyn PermissionRepository>,
        auth_service: Arc<AuthService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            users,
            permissions,
            auth_service,
            mailer,
        }
    }

    /// Registers a new, inactive user.
    ///
    /// # Flow
    ///
    /// 1. Hash the password and insert the user
    /// 2. Grant [`DEFAULT_PERMISSION`]
    /// 3. Issue an activation token valid for three days
    /// 4. Send the welcome email on a background task
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database or hashing errors.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: &str,
    ) -> Result<User, AppError> {
        let new_user = NewUser {
            username,
            email,
            password_hash: hash_password(password)?,
        };

        let user = self.users.insert(new_user).await.map_err(|e| match e {
            AppError::Conflict { .. } => AppError::validation(
                "Validation failed",
                json!({ "email": "a user with this email address already exists" }),
            ),
            other => other,
        })?;

        self.permissions
            .add_for_user(user.id, DEFAULT_PERMISSION)
            .await?;

        let token = self
            .auth_service
            .new_token(user.id, activation_token_ttl(), TokenScope::Activation)
            .await?;

        let welcome = WelcomeEmail {
            username: &user.username,
            user_id: user.id,
            activation_token: &token.plaintext,
        };
        match welcome.to_email(&user.email) {
            Ok(email) => {
                send_in_background(self.mailer.clone(), email);
            }
            Err(e) => tracing::error!(user_id = user.id, error = %e, "Failed to render welcome email"),
        }

        tracing::info!(user_id = user.id, "User registered");

        Ok(user)
    }

    /// Activates the user owning `token_plaintext`.
    ///
    /// All of the user's activation tokens are deleted afterwards, so a token
    /// works at most once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the token is unknown or expired.
    /// Returns [`AppError::Conflict`] if the user was modified concurrently.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn activate(&self, token_plaintext: &str) -> Result<User, AppError> {
        let Some(mut user) = self
            .auth_service
            .user_for_token(TokenScope::Activation, token_plaintext)
            .await?
        else {
            return Err(AppError::validation(
                "Validation failed",
                json!({ "token": "invalid or expired activation token" }),
            ));
        };

        user.activated = true;

        let user = self.users.update(&user).await?.ok_or_else(|| {
            AppError::conflict(
                "unable to update the record due to an edit conflict, please try again",
                json!({}),
            )
        })?;

        self.auth_service
            .revoke_all(TokenScope::Activation, user.id)
            .await?;

        tracing::info!(user_id = user.id, "User activated");

        Ok(user)
    }
}
