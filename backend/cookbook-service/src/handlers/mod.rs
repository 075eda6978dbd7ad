/// HTTP handlers for cookBook endpoints
///
/// - Posts: CRUD, media upload and the personalised feed
/// - Likes and comments, including category affinity and close friends
/// - Learning plans and progress updates
/// - Users and the follow graph
/// - Chat history and the chat WebSocket
pub mod chat;
pub mod comments;
pub mod health;
pub mod learning_plans;
pub mod likes;
pub mod posts;
pub mod progress;
pub mod users;

use crate::error::AppError;
use crate::realtime::chat_websocket;
use actix_web::{error, web, HttpRequest};

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("invalid JSON body: {}", err)).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("invalid path parameter: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("invalid query string: {}", err)).into()
}

/// Register every API route. Shared state (`PgPool`, `RankingService`,
/// `ChatHub`, `SessionVerifier`, configs) is provided by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(
            web::scope("/api/posts")
                .route("/create", web::post().to(posts::create_post))
                .route("/upload", web::post().to(posts::upload_media))
                .route("/all", web::get().to(posts::list_posts))
                .route("/feed", web::get().to(posts::get_feed))
                .route("/update/{id}", web::put().to(posts::update_post))
                .route("/delete/{id}", web::delete().to(posts::delete_post))
                .route("/{id}", web::get().to(posts::get_post)),
        )
        .service(
            web::scope("/api/likes")
                .route("", web::post().to(likes::like_post))
                .route("/affinity", web::get().to(likes::get_affinity))
                .route("/{post_id}/count", web::get().to(likes::like_count))
                .route("/{post_id}/user/{user_id}", web::get().to(likes::has_liked))
                .route("/{post_id}", web::delete().to(likes::unlike_post)),
        )
        .service(
            web::scope("/api/comments")
                .route("", web::post().to(comments::create_comment))
                .route(
                    "/close-friends/by-user/{user_name}",
                    web::get().to(comments::get_close_friends),
                )
                .route("/{id}", web::get().to(comments::get_post_comments))
                .route("/{id}", web::put().to(comments::update_comment))
                .route("/{id}", web::delete().to(comments::delete_comment)),
        )
        .service(
            web::scope("/api/learning-plans")
                .route("/all", web::get().to(learning_plans::list_plans))
                .route("/create", web::post().to(learning_plans::create_plan))
                .route("/update/{id}", web::put().to(learning_plans::update_plan))
                .route("/delete/{id}", web::delete().to(learning_plans::delete_plan))
                .route("/{id}", web::get().to(learning_plans::get_plan)),
        )
        .service(
            web::scope("/api/progress-updates")
                .route("/create", web::post().to(progress::create_progress_update))
                .route("/all", web::get().to(progress::list_progress_updates)),
        )
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list_users))
                .route("/me", web::get().to(users::get_me))
                .route("/me/followers", web::get().to(users::get_my_followers))
                .route("/me/following", web::get().to(users::get_my_following))
                .route("/{id}", web::get().to(users::get_user))
                .route("/{id}", web::put().to(users::update_user))
                .route("/{id}", web::delete().to(users::delete_user))
                .route("/{id}/follow", web::post().to(users::follow_user))
                .route("/{id}/unfollow", web::post().to(users::unfollow_user))
                .route("/{id}/followers", web::get().to(users::get_followers)),
        )
        .route("/chat/history", web::get().to(chat::chat_history))
        .route("/chat-websocket", web::get().to(chat_websocket));
}
