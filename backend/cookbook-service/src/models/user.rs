use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub provider_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub about: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with both sides of their follow graph.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub picture: Option<String>,
    pub birthday: Option<NaiveDate>,
    #[validate(length(max = 1000))]
    pub about: Option<String>,
}
