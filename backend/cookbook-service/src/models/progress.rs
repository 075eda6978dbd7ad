use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ProgressUpdate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub learning_plan_id: Uuid,
    pub template_type: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressUpdateRequest {
    pub learning_plan_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub template_type: String,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}
