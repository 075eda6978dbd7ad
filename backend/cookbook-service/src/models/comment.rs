use chrono::{DateTime, Utc};
use feed_ranking::CommentFact;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every edit
    pub updated_at: DateTime<Utc>,
}

impl CommentFact for Comment {
    fn post_id(&self) -> Uuid {
        self.post_id
    }

    fn commenter_id(&self) -> Option<Uuid> {
        self.user_id
    }

    fn commenter(&self) -> &str {
        &self.user_name
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}
