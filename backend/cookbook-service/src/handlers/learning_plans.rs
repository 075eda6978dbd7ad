/// Learning plan handlers
use crate::error::{AppError, Result};
use crate::models::{CreateLearningPlanRequest, LearningPlan, UpdateLearningPlanRequest};
use crate::repository::{LearningPlanRepository, UserRepository};
use actix_middleware::Principal;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerFilter {
    pub user_id: Option<Uuid>,
}

fn ensure_owner(plan: &LearningPlan, principal: &Principal) -> Result<()> {
    if plan.user_id != principal.user_id {
        return Err(AppError::Forbidden("only the owner can modify this learning plan".into()));
    }
    Ok(())
}

pub async fn list_plans(
    pool: web::Data<PgPool>,
    _principal: Principal,
    filter: web::Query<OwnerFilter>,
) -> Result<HttpResponse> {
    let plans = LearningPlanRepository::new(pool.get_ref().clone())
        .list(filter.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(plans))
}

pub async fn create_plan(
    pool: web::Data<PgPool>,
    principal: Principal,
    req: web::Json<CreateLearningPlanRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    UserRepository::new(pool.get_ref().clone())
        .ensure(principal.user_id, &principal.username, principal.email.as_deref())
        .await?;
    let plan = LearningPlanRepository::new(pool.get_ref().clone())
        .create(principal.user_id, &req)
        .await?;

    tracing::info!(user_id = %principal.user_id, plan_id = %plan.id, "learning plan created");
    Ok(HttpResponse::Created().json(plan))
}

pub async fn get_plan(
    pool: web::Data<PgPool>,
    _principal: Principal,
    plan_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let plan = LearningPlanRepository::new(pool.get_ref().clone())
        .find_by_id(*plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("learning plan {}", plan_id)))?;
    Ok(HttpResponse::Ok().json(plan))
}

pub async fn update_plan(
    pool: web::Data<PgPool>,
    principal: Principal,
    plan_id: web::Path<Uuid>,
    req: web::Json<UpdateLearningPlanRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let repo = LearningPlanRepository::new(pool.get_ref().clone());

    let existing = repo
        .find_by_id(*plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("learning plan {}", plan_id)))?;
    ensure_owner(&existing, &principal)?;

    let plan = repo
        .update(*plan_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("learning plan {}", plan_id)))?;
    Ok(HttpResponse::Ok().json(plan))
}

pub async fn delete_plan(
    pool: web::Data<PgPool>,
    principal: Principal,
    plan_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let repo = LearningPlanRepository::new(pool.get_ref().clone());

    let existing = repo
        .find_by_id(*plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("learning plan {}", plan_id)))?;
    ensure_owner(&existing, &principal)?;

    repo.delete(*plan_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
