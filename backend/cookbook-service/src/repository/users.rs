use crate::models::{UpdateUserRequest, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for user profiles
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the user if missing. An existing row only takes the session's
    /// email; the display name is owned by profile updates.
    pub async fn upsert(&self, id: Uuid, name: &str, email: Option<&str>) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET email = COALESCE(EXCLUDED.email, users.email),
                updated_at = NOW()
            RETURNING id, provider_id, name, email, picture, birthday, about, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }

    /// Insert the user if missing, leaving an existing row untouched.
    pub async fn ensure(&self, id: Uuid, name: &str, email: Option<&str>) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, provider_id, name, email, picture, birthday, about, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list(&self) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, provider_id, name, email, picture, birthday, about, created_at, updated_at
            FROM users
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Apply a partial update; `None` fields keep their stored value.
    pub async fn update(&self, id: Uuid, req: &UpdateUserRequest) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                picture = COALESCE($3, picture),
                birthday = COALESCE($4, birthday),
                about = COALESCE($5, about),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, provider_id, name, email, picture, birthday, about, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.name.as_deref())
        .bind(req.picture.as_deref())
        .bind(req.birthday)
        .bind(req.about.as_deref())
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a user. Follow edges, likes and plans go with it; posts and
    /// comments stay and lose their author link.
    pub async fn delete(&self, id: Uuid) -> sqlx::Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM follows WHERE follower_id = $1 OR followee_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
