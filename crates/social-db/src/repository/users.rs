//! User operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, User, UserPatch};
use crate::repository::Database;
use crate::utils::now_rfc3339;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Fails with `Duplicate` when the username or the email is already taken.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        if self
            .find_user_by_username_or_email(&user.username, &user.email)
            .await?
            .is_some()
        {
            return Err(DbError::Duplicate("Username or email already taken".to_string()));
        }

        let (now, now_str) = now_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, full_name, email, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&now_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Username or email already taken"))?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            full_name: user.full_name,
            email: user.email,
            created_at: now,
        })
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, password_hash, full_name, email, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, password_hash, full_name, email, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Find a user holding either the given username or the given email
    pub async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, password_hash, full_name, email, created_at
            FROM users
            WHERE username = ? OR email = ?
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, password_hash, full_name, email, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update, returning the updated user or `None` if absent
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = COALESCE(?, password_hash),
                full_name = COALESCE(?, full_name)
            WHERE id = ?
            "#,
        )
        .bind(patch.password_hash)
        .bind(patch.full_name)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user_by_id(id).await
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
