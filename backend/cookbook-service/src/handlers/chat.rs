use crate::config::ChatConfig;
use crate::error::Result;
use crate::repository::ChatRepository;
use actix_middleware::Principal;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

/// Latest chat messages, newest first
pub async fn chat_history(
    pool: web::Data<PgPool>,
    chat: web::Data<ChatConfig>,
    _principal: Principal,
) -> Result<HttpResponse> {
    let messages = ChatRepository::new(pool.get_ref().clone())
        .latest(chat.history_limit)
        .await?;
    Ok(HttpResponse::Ok().json(messages))
}
