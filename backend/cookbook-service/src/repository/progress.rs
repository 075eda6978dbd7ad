use crate::models::{CreateProgressUpdateRequest, ProgressUpdate};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for learning progress updates
#[derive(Clone)]
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        user_name: &str,
        req: &CreateProgressUpdateRequest,
    ) -> sqlx::Result<ProgressUpdate> {
        sqlx::query_as::<_, ProgressUpdate>(
            r#"
            INSERT INTO progress_updates (user_id, user_name, learning_plan_id, template_type, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, user_name, learning_plan_id, template_type, content, created_at
            "#,
        )
        .bind(user_id)
        .bind(user_name)
        .bind(req.learning_plan_id)
        .bind(req.template_type.trim())
        .bind(&req.content)
        .fetch_one(&self.pool)
        .await
    }

    /// Updates newest first, optionally restricted to one user.
    pub async fn list(&self, user_id: Option<Uuid>) -> sqlx::Result<Vec<ProgressUpdate>> {
        sqlx::query_as::<_, ProgressUpdate>(
            r#"
            SELECT id, user_id, user_name, learning_plan_id, template_type, content, created_at
            FROM progress_updates
            WHERE $1::uuid IS NULL OR user_id = $1
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
