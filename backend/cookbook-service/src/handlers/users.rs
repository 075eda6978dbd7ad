/// User profile and follow-graph handlers
use crate::error::{AppError, Result};
use crate::models::{UpdateUserRequest, User, UserProfile};
use crate::repository::{FollowRepository, UserRepository};
use actix_middleware::Principal;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

async fn profile(pool: &PgPool, user: User) -> Result<UserProfile> {
    let follows = FollowRepository::new(pool.clone());
    let followers = follows.followers(user.id).await?;
    let following = follows.following(user.id).await?;

    Ok(UserProfile {
        user,
        followers,
        following,
    })
}

fn ensure_self(user_id: Uuid, principal: &Principal) -> Result<()> {
    if user_id != principal.user_id {
        return Err(AppError::Forbidden("users can only modify their own profile".into()));
    }
    Ok(())
}

pub async fn list_users(pool: web::Data<PgPool>, _principal: Principal) -> Result<HttpResponse> {
    let users = UserRepository::new(pool.get_ref().clone()).list().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// The caller's profile. The first call creates the user record.
pub async fn get_me(pool: web::Data<PgPool>, principal: Principal) -> Result<HttpResponse> {
    let user = UserRepository::new(pool.get_ref().clone())
        .upsert(principal.user_id, &principal.username, principal.email.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(profile(pool.get_ref(), user).await?))
}

pub async fn get_user(
    pool: web::Data<PgPool>,
    _principal: Principal,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = UserRepository::new(pool.get_ref().clone())
        .find_by_id(*user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
    Ok(HttpResponse::Ok().json(profile(pool.get_ref(), user).await?))
}

pub async fn update_user(
    pool: web::Data<PgPool>,
    principal: Principal,
    user_id: web::Path<Uuid>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    ensure_self(*user_id, &principal)?;
    req.validate()?;

    let user = UserRepository::new(pool.get_ref().clone())
        .update(*user_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn delete_user(
    pool: web::Data<PgPool>,
    principal: Principal,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ensure_self(*user_id, &principal)?;

    let deleted = UserRepository::new(pool.get_ref().clone()).delete(*user_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("user {}", user_id)));
    }

    info!(user_id = %user_id, "user deleted");
    Ok(HttpResponse::NoContent().finish())
}

pub async fn follow_user(
    pool: web::Data<PgPool>,
    principal: Principal,
    target: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if *target == principal.user_id {
        return Err(AppError::BadRequest("users cannot follow themselves".into()));
    }

    let users = UserRepository::new(pool.get_ref().clone());
    users
        .find_by_id(*target)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", target)))?;
    users
        .ensure(principal.user_id, &principal.username, principal.email.as_deref())
        .await?;

    let created = FollowRepository::new(pool.get_ref().clone())
        .follow(principal.user_id, *target)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": if created { "followed" } else { "already_following" }
    })))
}

pub async fn unfollow_user(
    pool: web::Data<PgPool>,
    principal: Principal,
    target: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let removed = FollowRepository::new(pool.get_ref().clone())
        .unfollow(principal.user_id, *target)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": if removed { "unfollowed" } else { "not_following" }
    })))
}

pub async fn get_followers(
    pool: web::Data<PgPool>,
    _principal: Principal,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let followers = FollowRepository::new(pool.get_ref().clone())
        .followers(*user_id)
        .await?;
    Ok(HttpResponse::Ok().json(followers))
}

pub async fn get_my_followers(pool: web::Data<PgPool>, principal: Principal) -> Result<HttpResponse> {
    let followers = FollowRepository::new(pool.get_ref().clone())
        .followers(principal.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(followers))
}

pub async fn get_my_following(pool: web::Data<PgPool>, principal: Principal) -> Result<HttpResponse> {
    let following = FollowRepository::new(pool.get_ref().clone())
        .following(principal.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(following))
}
