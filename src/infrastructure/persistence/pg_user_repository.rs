//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUser, TokenScope, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// PostgreSQL repository for user accounts.
///
/// Emails are unique case-insensitively (`users_email_key` on `LOWER(email)`).
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, activated)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, created_at, username, email, password_hash, activated, version
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at, username, email, password_hash, activated, version
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_for_token(
        &self,
        scope: TokenScope,
        token_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.created_at, u.username, u.email, u.password_hash, u.activated, u.version
            FROM users u
            INNER JOIN tokens t ON t.user_id = u.id
            WHERE t.hash = $1
              AND t.scope = $2
              AND t.expiry > NOW()
            "#,
        )
        .bind(token_hash)
        .bind(scope.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<Option<User>, AppError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $1, email = $2, password_hash = $3, activated = $4,
                version = version + 1
            WHERE id = $5 AND version = $6
            RETURNING id, created_at, username, email, password_hash, activated, version
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.activated)
        .bind(user.id)
        .bind(user.version)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(updated)
    }
}
