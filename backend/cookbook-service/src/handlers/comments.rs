/// Comment handlers - HTTP endpoints for comment operations
use crate::error::{AppError, Result};
use crate::models::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::realtime::{ChatHub, NotificationKind};
use crate::repository::{CommentRepository, PostRepository, UserRepository};
use crate::services::RankingService;
use actix_middleware::Principal;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

fn ensure_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AppError::ValidationError("comment text must not be blank".into()));
    }
    Ok(())
}

fn ensure_commenter(comment: &Comment, principal: &Principal) -> Result<()> {
    if comment.user_id != Some(principal.user_id) {
        return Err(AppError::Forbidden("only the commenter can modify this comment".into()));
    }
    Ok(())
}

/// Create a new comment
pub async fn create_comment(
    pool: web::Data<PgPool>,
    hub: web::Data<ChatHub>,
    principal: Principal,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    ensure_text(&req.text)?;

    PostRepository::new(pool.get_ref().clone())
        .find_by_id(req.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", req.post_id)))?;

    UserRepository::new(pool.get_ref().clone())
        .ensure(principal.user_id, &principal.username, principal.email.as_deref())
        .await?;

    let comment = CommentRepository::new(pool.get_ref().clone())
        .create(req.post_id, principal.user_id, &principal.username, req.text.trim())
        .await?;

    info!(user_id = %principal.user_id, post_id = %comment.post_id, "comment created");
    hub.notify(
        NotificationKind::Comment,
        &principal.username,
        format!("{} commented on a post", principal.username),
    );

    Ok(HttpResponse::Created().json(comment))
}

/// Comments for a post, oldest first
pub async fn get_post_comments(
    pool: web::Data<PgPool>,
    _principal: Principal,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = CommentRepository::new(pool.get_ref().clone())
        .for_post(*post_id)
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn update_comment(
    pool: web::Data<PgPool>,
    principal: Principal,
    comment_id: web::Path<Uuid>,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    ensure_text(&req.text)?;
    let repo = CommentRepository::new(pool.get_ref().clone());

    let existing = repo
        .find_by_id(*comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;
    ensure_commenter(&existing, &principal)?;

    let comment = repo
        .update_text(*comment_id, req.text.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    pool: web::Data<PgPool>,
    principal: Principal,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let repo = CommentRepository::new(pool.get_ref().clone());

    let existing = repo
        .find_by_id(*comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;
    ensure_commenter(&existing, &principal)?;

    repo.delete(*comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `[[name, count], ...]` for users commenting on `userName`'s posts
pub async fn get_close_friends(
    ranking: web::Data<RankingService>,
    _principal: Principal,
    user_name: web::Path<String>,
) -> Result<HttpResponse> {
    let friends: Vec<(String, usize)> = ranking
        .close_friends(&user_name)
        .await?
        .into_iter()
        .map(|f| (f.name, f.comment_count))
        .collect();

    Ok(HttpResponse::Ok().json(friends))
}
