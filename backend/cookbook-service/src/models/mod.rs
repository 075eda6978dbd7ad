//! Stored entities and request/response bodies

pub mod chat;
pub mod comment;
pub mod learning_plan;
pub mod like;
pub mod post;
pub mod progress;
pub mod user;

pub use chat::ChatMessage;
pub use comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
pub use learning_plan::{
    Activity, CreateLearningPlanRequest, LearningPlan, LearningResource, UpdateLearningPlanRequest,
};
pub use like::{CreateLikeRequest, Like, LikeCountResponse, LikeStatusResponse};
pub use post::{CreatePostRequest, FeedQuery, Post, UpdatePostRequest, UploadResponse};
pub use progress::{CreateProgressUpdateRequest, ProgressUpdate};
pub use user::{UpdateUserRequest, User, UserProfile};

/// Display name used when a post's author is unknown.
pub const ANONYMOUS: &str = "Anonymous";
