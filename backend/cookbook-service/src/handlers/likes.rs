/// Like handlers, including the caller's category affinity
use crate::error::{AppError, Result};
use crate::metrics::feed::LIKES_TOTAL;
use crate::models::{CreateLikeRequest, LikeCountResponse, LikeStatusResponse};
use crate::realtime::{ChatHub, NotificationKind};
use crate::repository::likes::LikeOutcome;
use crate::repository::{LikeRepository, UserRepository};
use crate::services::RankingService;
use actix_middleware::Principal;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Like a post. Repeating a like is not an error.
pub async fn like_post(
    pool: web::Data<PgPool>,
    hub: web::Data<ChatHub>,
    principal: Principal,
    req: web::Json<CreateLikeRequest>,
) -> Result<HttpResponse> {
    UserRepository::new(pool.get_ref().clone())
        .ensure(principal.user_id, &principal.username, principal.email.as_deref())
        .await?;

    let outcome = LikeRepository::new(pool.get_ref().clone())
        .create_like(principal.user_id, &principal.username, req.post_id)
        .await?;

    match outcome {
        LikeOutcome::Created(like) => {
            LIKES_TOTAL.with_label_values(&["created"]).inc();
            info!(user_id = %principal.user_id, post_id = %like.post_id, "post liked");
            hub.notify(
                NotificationKind::Like,
                &principal.username,
                format!("{} liked a post", principal.username),
            );
            Ok(HttpResponse::Created().json(like))
        }
        LikeOutcome::AlreadyLiked => {
            LIKES_TOTAL.with_label_values(&["already_liked"]).inc();
            Ok(HttpResponse::Ok().json(serde_json::json!({"status": "already_liked"})))
        }
        LikeOutcome::PostNotFound => {
            LIKES_TOTAL.with_label_values(&["not_found"]).inc();
            Err(AppError::NotFound(format!("post {}", req.post_id)))
        }
    }
}

pub async fn unlike_post(
    pool: web::Data<PgPool>,
    principal: Principal,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let removed = LikeRepository::new(pool.get_ref().clone())
        .delete_like(principal.user_id, *post_id)
        .await?;

    if !removed {
        return Err(AppError::NotFound(format!("like on post {}", post_id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub async fn like_count(
    pool: web::Data<PgPool>,
    _principal: Principal,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let count = LikeRepository::new(pool.get_ref().clone())
        .get_like_count(*post_id)
        .await?;

    Ok(HttpResponse::Ok().json(LikeCountResponse {
        post_id: *post_id,
        count,
    }))
}

pub async fn has_liked(
    pool: web::Data<PgPool>,
    _principal: Principal,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, user_id) = path.into_inner();
    let liked = LikeRepository::new(pool.get_ref().clone())
        .check_user_liked(user_id, post_id)
        .await?;

    Ok(HttpResponse::Ok().json(LikeStatusResponse {
        post_id,
        user_id,
        liked,
    }))
}

/// The caller's liked categories, strongest first
pub async fn get_affinity(ranking: web::Data<RankingService>, principal: Principal) -> Result<HttpResponse> {
    let affinity = ranking.affinity(principal.user_id).await?;
    Ok(HttpResponse::Ok().json(affinity))
}
