/// Progress update handlers
use crate::error::{AppError, Result};
use crate::handlers::learning_plans::OwnerFilter;
use crate::models::CreateProgressUpdateRequest;
use crate::repository::{LearningPlanRepository, ProgressRepository, UserRepository};
use actix_middleware::Principal;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

pub async fn create_progress_update(
    pool: web::Data<PgPool>,
    principal: Principal,
    req: web::Json<CreateProgressUpdateRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if !LearningPlanRepository::new(pool.get_ref().clone())
        .exists(req.learning_plan_id)
        .await?
    {
        return Err(AppError::NotFound(format!("learning plan {}", req.learning_plan_id)));
    }

    UserRepository::new(pool.get_ref().clone())
        .ensure(principal.user_id, &principal.username, principal.email.as_deref())
        .await?;
    let update = ProgressRepository::new(pool.get_ref().clone())
        .create(principal.user_id, &principal.username, &req)
        .await?;

    Ok(HttpResponse::Created().json(update))
}

/// Progress updates, newest first
pub async fn list_progress_updates(
    pool: web::Data<PgPool>,
    _principal: Principal,
    filter: web::Query<OwnerFilter>,
) -> Result<HttpResponse> {
    let updates = ProgressRepository::new(pool.get_ref().clone())
        .list(filter.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(updates))
}
