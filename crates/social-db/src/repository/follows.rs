//! Follow relationship operations

use crate::error::DbError;
use crate::models::{Follow, User};
use crate::repository::Database;
use crate::utils::now_rfc3339;

impl Database {
    // ==================== Follow Operations ====================

    /// Record that `follower_id` follows `following_id`
    pub async fn insert_follow(&self, following_id: i64, follower_id: i64) -> Result<Follow, DbError> {
        let (now, now_str) = now_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO follows (following_user_id, follower_user_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(following_id)
        .bind(follower_id)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, format!("User {} already follows {}", follower_id, following_id))
        })?;

        Ok(Follow {
            following_user_id: following_id,
            follower_user_id: follower_id,
            created_at: now,
        })
    }

    /// Remove a follow edge
    pub async fn delete_follow(&self, following_id: i64, follower_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            "DELETE FROM follows WHERE following_user_id = ? AND follower_user_id = ?",
        )
        .bind(following_id)
        .bind(follower_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Users following `user_id`
    pub async fn list_followers(&self, user_id: i64) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.password_hash, u.full_name, u.email, u.created_at
            FROM follows f
            JOIN users u ON u.id = f.follower_user_id
            WHERE f.following_user_id = ?
            ORDER BY f.created_at, u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Users that `user_id` follows
    pub async fn list_following(&self, user_id: i64) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.password_hash, u.full_name, u.email, u.created_at
            FROM follows f
            JOIN users u ON u.id = f.following_user_id
            WHERE f.follower_user_id = ?
            ORDER BY f.created_at, u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }
}
