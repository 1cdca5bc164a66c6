//! Post operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewPost, Post, PostPatch};
use crate::repository::Database;
use crate::utils::now_rfc3339;

impl Database {
    // ==================== Post Operations ====================

    /// Insert a new post
    pub async fn insert_post(&self, post: NewPost) -> Result<Post, DbError> {
        let (now, now_str) = now_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO posts (title, body, user_id, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.user_id)
        .bind(&post.status)
        .bind(&now_str)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Post {
            id,
            title: post.title,
            body: post.body,
            user_id: post.user_id,
            status: post.status,
            created_at: now,
        })
    }

    /// Get a post by ID
    pub async fn get_post(&self, id: i64) -> Result<Option<Post>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, title, body, user_id, status, created_at
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Post::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all posts, oldest first
    pub async fn list_posts(&self) -> Result<Vec<Post>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, user_id, status, created_at
            FROM posts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Post::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update, returning the updated post or `None` if absent
    pub async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE(?, title),
                body = COALESCE(?, body),
                status = COALESCE(?, status)
            WHERE id = ?
            "#,
        )
        .bind(patch.title)
        .bind(patch.body)
        .bind(patch.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_post(id).await
    }

    /// Delete a post
    pub async fn delete_post(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{db, user};

    fn new_post(user_id: i64) -> NewPost {
        NewPost {
            title: "First post".to_string(),
            body: "Hello from the feed".to_string(),
            user_id,
            status: "published".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_get_list() {
        let db = db().await;
        let author = user(&db, "author_one").await;

        let post = db.insert_post(new_post(author.id)).await.unwrap();
        let fetched = db.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "First post");
        assert_eq!(fetched.user_id, author.id);

        assert_eq!(db.list_posts().await.unwrap().len(), 1);
        assert!(db.get_post(post.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_author_rejected() {
        let db = db().await;
        assert!(db.insert_post(new_post(42)).await.is_err());
    }

    #[tokio::test]
    async fn test_update_keeps_untouched_fields() {
        let db = db().await;
        let author = user(&db, "author_one").await;
        let post = db.insert_post(new_post(author.id)).await.unwrap();

        let updated = db
            .update_post(
                post.id,
                PostPatch {
                    status: Some("archived".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, "archived");
        assert_eq!(updated.title, post.title);
        assert_eq!(updated.body, post.body);
        assert_eq!(updated.user_id, author.id);
    }

    #[tokio::test]
    async fn test_posts_removed_with_author() {
        let db = db().await;
        let author = user(&db, "author_one").await;
        let post = db.insert_post(new_post(author.id)).await.unwrap();

        assert!(db.delete_user(author.id).await.unwrap());
        assert!(db.get_post(post.id).await.unwrap().is_none());
        assert!(!db.delete_post(post.id).await.unwrap());
    }
}
