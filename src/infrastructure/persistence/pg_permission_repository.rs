//! PostgreSQL implementation of permission repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Permissions;
use crate::domain::repositories::PermissionRepository;
use crate::error::AppError;

/// PostgreSQL repository for per-user permission codes.
pub struct PgPermissionRepository {
    pool: Arc<PgPool>,
}

impl PgPermissionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for PgPermissionRepository {
    async fn get_all_for_user(&self, user_id: i64) -> Result<Permissions, AppError> {
        let codes = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.code
            FROM permissions p
            INNER JOIN users_permissions up ON up.permission_id = p.id
            WHERE up.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(codes.into_iter().collect())
    }

    async fn add_for_user(&self, user_id: i64, code: &str) -> Result<(), AppError> {
        let permission_id =
            sqlx::query_scalar::<_, i64>("SELECT id FROM permissions WHERE code = $1")
                .bind(code)
                .fetch_optional(self.pool.as_ref())
                .await?
                .ok_or_else(|| {
                    AppError::not_found("Unknown permission", json!({ "code": code }))
                })?;

        sqlx::query(
            r#"
            INSERT INTO users_permissions (user_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn remove_for_user(&self, user_id: i64, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users_permissions up
            USING permissions p
            WHERE up.permission_id = p.id
              AND up.user_id = $1
              AND p.code = $2
            "#,
        )
        .bind(user_id)
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
