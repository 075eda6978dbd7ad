use crate::models::ChatMessage;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for group chat messages
#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, sender_id: Uuid, sender_name: &str, content: &str) -> sqlx::Result<ChatMessage> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (sender_id, sender_name, content)
            VALUES ($1, $2, $3)
            RETURNING id, sender_id, sender_name, content, created_at, updated_at
            "#,
        )
        .bind(sender_id)
        .bind(sender_name)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    /// Most recent messages, newest first.
    pub async fn latest(&self, limit: i64) -> sqlx::Result<Vec<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, sender_id, sender_name, content, created_at, updated_at
            FROM chat_messages
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Edit a message, only if `sender_id` wrote it.
    pub async fn update_own(&self, id: Uuid, sender_id: Uuid, content: &str) -> sqlx::Result<Option<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            UPDATE chat_messages
            SET content = $3, updated_at = NOW()
            WHERE id = $1 AND sender_id = $2
            RETURNING id, sender_id, sender_name, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(sender_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a message, only if `sender_id` wrote it.
    pub async fn delete_own(&self, id: Uuid, sender_id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE id = $1 AND sender_id = $2")
            .bind(id)
            .bind(sender_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
