use chrono::{DateTime, Utc};
use feed_ranking::LikeFact;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub post_id: Uuid,
    /// Category of the post at the time it was liked
    pub post_category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LikeFact for Like {
    fn category(&self) -> Option<&str> {
        self.post_category.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLikeRequest {
    pub post_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LikeCountResponse {
    pub post_id: Uuid,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LikeStatusResponse {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub liked: bool,
}
