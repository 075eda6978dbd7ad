/// OpenAPI documentation for cookBook Service
use crate::models::{
    Activity, ChatMessage, Comment, CreateCommentRequest, CreateLearningPlanRequest, CreateLikeRequest,
    CreatePostRequest, CreateProgressUpdateRequest, LearningPlan, LearningResource, Like,
    LikeCountResponse, LikeStatusResponse, Post, ProgressUpdate, UpdateCommentRequest,
    UpdateLearningPlanRequest, UpdatePostRequest, UpdateUserRequest, UploadResponse, User, UserProfile,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "cookBook Service API",
        version = "1.0.0",
        description = "Recipe sharing backend: posts, likes, comments, learning plans, follows and group chat. The post feed is personalised from each user's liked categories.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    components(schemas(
        Post, CreatePostRequest, UpdatePostRequest, UploadResponse,
        Like, CreateLikeRequest, LikeCountResponse, LikeStatusResponse,
        Comment, CreateCommentRequest, UpdateCommentRequest,
        LearningPlan, Activity, LearningResource, CreateLearningPlanRequest, UpdateLearningPlanRequest,
        ProgressUpdate, CreateProgressUpdateRequest,
        User, UserProfile, UpdateUserRequest,
        ChatMessage,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "posts", description = "Post creation, retrieval, updates, deletion and media upload"),
        (name = "feed", description = "Personalised feed ranked by category affinity and popularity"),
        (name = "likes", description = "Likes and category affinity"),
        (name = "comments", description = "Comments and close-friends inference"),
        (name = "learning", description = "Learning plans and progress updates"),
        (name = "users", description = "Profiles and the follow graph"),
        (name = "chat", description = "Group chat history and WebSocket"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 session token"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/openapi.json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_has_schemas_and_bearer_auth() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json["components"]["schemas"]["Post"].is_object());
        assert!(json["components"]["schemas"]["LearningPlan"].is_object());
        assert_eq!(json["components"]["securitySchemes"]["bearer_auth"]["scheme"], "bearer");
    }
}
