/// Fact store: the reads the ranking pass needs, behind a trait so the
/// ranking service can run against PostgreSQL or an in-memory fixture.
use crate::error::Result;
use crate::models::{Comment, Like, Post};
use crate::repository::{CommentRepository, LikeRepository, PostRepository};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

#[async_trait]
pub trait FactStore: Send + Sync {
    /// Every like `user_id` has given.
    async fn likes_by_user(&self, user_id: Uuid) -> Result<Vec<Like>>;

    /// One page of posts visible to `viewer`, in storage order.
    async fn posts_page(&self, viewer: Uuid, offset: i64, limit: i64) -> Result<Vec<Post>>;

    /// Like counts keyed by post id; posts without likes may be absent.
    async fn like_counts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>>;

    /// Posts authored by the user with this display name.
    async fn posts_by_author_name(&self, name: &str) -> Result<Vec<Post>>;

    async fn comments_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>>;
}

/// PostgreSQL-backed fact store
#[derive(Clone)]
pub struct PgFactStore {
    posts: PostRepository,
    likes: LikeRepository,
    comments: CommentRepository,
}

impl PgFactStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PostRepository::new(pool.clone()),
            likes: LikeRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
        }
    }
}

#[async_trait]
impl FactStore for PgFactStore {
    async fn likes_by_user(&self, user_id: Uuid) -> Result<Vec<Like>> {
        Ok(self.likes.likes_by_user(user_id).await?)
    }

    async fn posts_page(&self, viewer: Uuid, offset: i64, limit: i64) -> Result<Vec<Post>> {
        Ok(self.posts.page_visible(viewer, offset, limit).await?)
    }

    async fn like_counts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>> {
        Ok(self.likes.counts_for_posts(post_ids).await?)
    }

    async fn posts_by_author_name(&self, name: &str) -> Result<Vec<Post>> {
        Ok(self.posts.by_author_name(name).await?)
    }

    async fn comments_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>> {
        Ok(self.comments.for_posts(post_ids).await?)
    }
}
