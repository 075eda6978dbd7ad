use crate::models::Comment;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for comments
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, post_id: Uuid, user_id: Uuid, user_name: &str, text: &str) -> sqlx::Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, user_name, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, user_id, user_name, text, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(user_name)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, user_name, text, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Comments on one post, oldest first.
    pub async fn for_post(&self, post_id: Uuid) -> sqlx::Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, user_name, text, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn for_posts(&self, post_ids: &[Uuid]) -> sqlx::Result<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, user_name, text, created_at, updated_at
            FROM comments
            WHERE post_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
    }

    /// Replace the text and refresh `updated_at`.
    pub async fn update_text(&self, id: Uuid, text: &str) -> sqlx::Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET text = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, post_id, user_id, user_name, text, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
