//! Token issuing and token-to-user resolution.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{NewToken, Token, TokenScope, User};
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::verify_password;
use crate::utils::token_generator::generate_token;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of an authentication token.
pub fn authentication_token_ttl() -> Duration {
    Duration::hours(24)
}

/// Lifetime of an activation token.
pub fn activation_token_ttl() -> Duration {
    Duration::days(3)
}

/// Service for issuing tokens and resolving them back to users.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - user repository used for token and credential lookups
    /// - `tokens` - token repository for storing hashes
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        signing_secret: String,
    ) -> Self {
        Self {
            users,
            tokens,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Issues and stores a new token for `user_id`.
    ///
    /// The returned [`Token`] is the only place the plaintext ever appears.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on RNG or database errors.
    pub async fn new_token(
        &self,
        user_id: i64,
        ttl: Duration,
        scope: TokenScope,
    ) -> Result<Token, AppError> {
        let plaintext = generate_token()?;
        let token = Token {
            hash: self.hash_token(&plaintext),
            plaintext,
            user_id,
            expiry: Utc::now() + ttl,
            scope,
        };

        self.tokens.insert(NewToken::from(&token)).await?;

        Ok(token)
    }

    /// Resolves a plaintext token of `scope` to its owner.
    ///
    /// Returns `Ok(None)` for unknown or expired tokens. The plaintext format is
    /// not checked here; callers validate it before paying for a lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn user_for_token(
        &self,
        scope: TokenScope,
        plaintext: &str,
    ) -> Result<Option<User>, AppError> {
        let token_hash = self.hash_token(plaintext);
        self.users.get_for_token(scope, &token_hash).await
    }

    /// Exchanges an email/password pair for a fresh authentication token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCredentials`] if the email is unknown or the
    /// password does not match.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_authentication_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Token, AppError> {
        let Some(user) = self.users.get_by_email(email).await? else {
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::invalid_credentials());
        }

        self.new_token(user.id, authentication_token_ttl(), TokenScope::Authentication)
            .await
    }

    /// Deletes every token of `scope` owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn revoke_all(&self, scope: TokenScope, user_id: i64) -> Result<(), AppError> {
        self.tokens.delete_all_for_user(scope, user_id).await
    }
}
