use crate::models::Like;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Outcome of a like request
#[derive(Debug, Clone)]
pub enum LikeOutcome {
    Created(Like),
    AlreadyLiked,
    PostNotFound,
}

/// Repository for likes
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Like a post, copying its category onto the like in the same statement.
    ///
    /// Another user's private post is reported as `PostNotFound`.
    pub async fn create_like(&self, user_id: Uuid, user_name: &str, post_id: Uuid) -> sqlx::Result<LikeOutcome> {
        let inserted = sqlx::query_as::<_, Like>(
            r#"
            INSERT INTO likes (user_id, user_name, post_id, post_category)
            SELECT $1, $2, p.id, p.category
            FROM posts p
            WHERE p.id = $3
              AND (p.is_private = FALSE OR p.user_id = $1)
            ON CONFLICT (user_id, post_id) DO NOTHING
            RETURNING id, user_id, user_name, post_id, post_category, created_at
            "#,
        )
        .bind(user_id)
        .bind(user_name)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(like) = inserted {
            return Ok(LikeOutcome::Created(like));
        }

        if self.check_user_liked(user_id, post_id).await? {
            Ok(LikeOutcome::AlreadyLiked)
        } else {
            Ok(LikeOutcome::PostNotFound)
        }
    }

    /// Delete a like (idempotent - returns false if it didn't exist)
    pub async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn check_user_liked(&self, user_id: Uuid, post_id: Uuid) -> sqlx::Result<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND post_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_like_count(&self, post_id: Uuid) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Like counts for a batch of posts. Posts without likes are absent.
    pub async fn counts_for_posts(&self, post_ids: &[Uuid]) -> sqlx::Result<HashMap<Uuid, i64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT post_id, COUNT(*)
            FROM likes
            WHERE post_id = ANY($1)
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// All likes a user has given, oldest first.
    pub async fn likes_by_user(&self, user_id: Uuid) -> sqlx::Result<Vec<Like>> {
        sqlx::query_as::<_, Like>(
            r#"
            SELECT id, user_id, user_name, post_id, post_category, created_at
            FROM likes
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
