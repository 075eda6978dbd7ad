use sqlx::PgPool;
use uuid::Uuid;

/// Repository for the follow graph
#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a follow edge. Returns false if it already existed.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a follow edge. Returns false if there was none.
    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn followers(&self, user_id: Uuid) -> sqlx::Result<Vec<Uuid>> {
        sqlx::query_scalar(
            r#"
            SELECT follower_id FROM follows
            WHERE followee_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn following(&self, user_id: Uuid) -> sqlx::Result<Vec<Uuid>> {
        sqlx::query_scalar(
            r#"
            SELECT followee_id FROM follows
            WHERE follower_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
