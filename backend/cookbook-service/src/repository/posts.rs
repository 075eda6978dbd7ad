use crate::models::{CreatePostRequest, Post, UpdatePostRequest, ANONYMOUS};
use feed_ranking::normalize_category;
use sqlx::PgPool;
use uuid::Uuid;

/// Post columns with the author name resolved. `$1` is the fallback name.
const POST_COLUMNS: &str = r#"
    p.id, p.user_id, COALESCE(u.name, $1) AS user_name, p.category, p.description,
    p.media_urls, p.media_types, p.is_private, p.tagged_friends, p.location,
    p.created_at, p.updated_at
"#;

/// Repository for posts
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author: Uuid, req: &CreatePostRequest) -> sqlx::Result<Post> {
        let category = normalize_category(req.category.as_deref()).to_string();

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO posts (user_id, category, description, media_urls, media_types,
                               is_private, tagged_friends, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(author)
        .bind(category)
        .bind(&req.description)
        .bind(&req.media_urls)
        .bind(&req.media_types)
        .bind(req.is_private)
        .bind(&req.tagged_friends)
        .bind(req.location.as_deref())
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p LEFT JOIN users u ON u.id = p.user_id WHERE p.id = $2"
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(ANONYMOUS)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Every post `viewer` may see, newest first.
    pub async fn list_visible(&self, viewer: Uuid) -> sqlx::Result<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p LEFT JOIN users u ON u.id = p.user_id
            WHERE p.is_private = FALSE OR p.user_id = $2
            ORDER BY p.created_at DESC, p.id ASC
            "#
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(ANONYMOUS)
            .bind(viewer)
            .fetch_all(&self.pool)
            .await
    }

    /// One page of visible posts in storage order (oldest first).
    pub async fn page_visible(&self, viewer: Uuid, offset: i64, limit: i64) -> sqlx::Result<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p LEFT JOIN users u ON u.id = p.user_id
            WHERE p.is_private = FALSE OR p.user_id = $2
            ORDER BY p.created_at ASC, p.id ASC
            LIMIT $3 OFFSET $4
            "#
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(ANONYMOUS)
            .bind(viewer)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    /// Posts written by users with this display name.
    pub async fn by_author_name(&self, name: &str) -> sqlx::Result<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p JOIN users u ON u.id = p.user_id
            WHERE u.name = $2
            ORDER BY p.created_at ASC, p.id ASC
            "#
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(ANONYMOUS)
            .bind(name)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn update(&self, id: Uuid, req: &UpdatePostRequest) -> sqlx::Result<Option<Post>> {
        let category = req
            .category
            .as_deref()
            .map(|c| normalize_category(Some(c)).to_string());

        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET category = COALESCE($2, category),
                description = COALESCE($3, description),
                media_urls = COALESCE($4, media_urls),
                media_types = COALESCE($5, media_types),
                is_private = COALESCE($6, is_private),
                tagged_friends = COALESCE($7, tagged_friends),
                location = COALESCE($8, location),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(category)
        .bind(req.description.as_deref())
        .bind(req.media_urls.as_ref())
        .bind(req.media_types.as_ref())
        .bind(req.is_private)
        .bind(req.tagged_friends.as_ref())
        .bind(req.location.as_deref())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Delete a post; likes and comments cascade.
    pub async fn delete(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

