use chrono::{DateTime, Utc};
use feed_ranking::FeedItem;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A post as returned to clients, with the author's display name resolved.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: String,
    pub category: String,
    pub description: String,
    pub media_urls: Vec<String>,
    pub media_types: Vec<String>,
    pub is_private: bool,
    pub tagged_friends: Vec<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedItem for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(length(max = 64))]
    pub category: Option<String>,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 10))]
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[validate(length(max = 10))]
    #[serde(default)]
    pub media_types: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub tagged_friends: Vec<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    #[validate(length(max = 64))]
    pub category: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 10))]
    pub media_urls: Option<Vec<String>>,
    #[validate(length(max = 10))]
    pub media_types: Option<Vec<String>>,
    pub is_private: Option<bool>,
    #[validate(length(max = 50))]
    pub tagged_friends: Option<Vec<String>>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FeedQuery {
    /// Zero-based page of the candidate pool
    pub page: Option<u32>,
    /// Candidates per page
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub media_urls: Vec<String>,
    pub media_types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_post_defaults() {
        let req: CreatePostRequest = serde_json::from_value(json!({"category": "dessert"})).unwrap();

        assert!(req.validate().is_ok());
        assert!(!req.is_private);
        assert!(req.media_urls.is_empty());
    }

    #[test]
    fn test_too_many_media_rejected() {
        let urls: Vec<String> = (0..11).map(|i| format!("/uploads/{}.jpg", i)).collect();
        let req: CreatePostRequest = serde_json::from_value(json!({"media_urls": urls})).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_post_category_feeds_ranking() {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: None,
            user_name: crate::models::ANONYMOUS.to_string(),
            category: "main".to_string(),
            description: String::new(),
            media_urls: vec![],
            media_types: vec![],
            is_private: false,
            tagged_friends: vec![],
            location: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(FeedItem::category(&post), Some("main"));
        assert_eq!(FeedItem::id(&post), post.id);
    }
}
