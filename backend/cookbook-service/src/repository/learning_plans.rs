use crate::models::{CreateLearningPlanRequest, LearningPlan, UpdateLearningPlanRequest};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for learning plans
#[derive(Clone)]
pub struct LearningPlanRepository {
    pool: PgPool,
}

impl LearningPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner: Uuid, req: &CreateLearningPlanRequest) -> sqlx::Result<LearningPlan> {
        sqlx::query_as::<_, LearningPlan>(
            r#"
            INSERT INTO learning_plans (user_id, title, description, start_date, activities)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, start_date, activities, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.start_date)
        .bind(Json(&req.activities))
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<LearningPlan>> {
        sqlx::query_as::<_, LearningPlan>(
            r#"
            SELECT id, user_id, title, description, start_date, activities, created_at, updated_at
            FROM learning_plans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn exists(&self, id: Uuid) -> sqlx::Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM learning_plans WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Plans newest first, optionally restricted to one owner.
    pub async fn list(&self, owner: Option<Uuid>) -> sqlx::Result<Vec<LearningPlan>> {
        sqlx::query_as::<_, LearningPlan>(
            r#"
            SELECT id, user_id, title, description, start_date, activities, created_at, updated_at
            FROM learning_plans
            WHERE $1::uuid IS NULL OR user_id = $1
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, req: &UpdateLearningPlanRequest) -> sqlx::Result<Option<LearningPlan>> {
        sqlx::query_as::<_, LearningPlan>(
            r#"
            UPDATE learning_plans
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                activities = COALESCE($5, activities),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, description, start_date, activities, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.title.as_deref())
        .bind(req.description.as_deref())
        .bind(req.start_date)
        .bind(req.activities.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a plan; its progress updates cascade.
    pub async fn delete(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM learning_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
