//! Personalised feed, category affinity and close-friends inference.
//!
//! Each call fetches a fresh snapshot from the [`FactStore`] and hands it
//! to the pure functions in `feed_ranking`.

use crate::config::FeedConfig;
use crate::error::{AppError, Result};
use crate::metrics::feed::{FEED_ASSEMBLY_SECONDS, FEED_CANDIDATES, FEED_REQUESTS_TOTAL};
use crate::models::Post;
use crate::services::fact_store::FactStore;
use actix_middleware::Principal;
use feed_ranking::{
    category_affinity, infer_close_friends, CategoryAffinity, FeedAssembler, FeedFailurePolicy,
    FeedItem, FeedRequest, FriendScore, RankingError,
};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

pub struct RankingService {
    store: Arc<dyn FactStore>,
    assembler: FeedAssembler,
    policy: FeedFailurePolicy,
    default_page_size: u32,
    max_page_size: u32,
}

impl RankingService {
    pub fn new(store: Arc<dyn FactStore>, config: &FeedConfig) -> Self {
        Self {
            store,
            assembler: FeedAssembler::new(config.preferred_order()),
            policy: config.failure_policy(),
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    /// Category affinity for one user, strongest first.
    pub async fn affinity(&self, user_id: Uuid) -> Result<Vec<CategoryAffinity>> {
        if user_id.is_nil() {
            return Err(RankingError::InvalidInput("user id must not be nil".into()).into());
        }

        let likes = self.store.likes_by_user(user_id).await?;
        let affinity = category_affinity(&likes);
        debug!(user_id = %user_id, likes = likes.len(), categories = affinity.len(), "affinity computed");
        Ok(affinity)
    }

    /// One page of the viewer's personalised feed.
    ///
    /// Invalid paging is always an error. Fetch failures go through the
    /// configured failure policy.
    pub async fn feed(&self, viewer: &Principal, page: Option<u32>, size: Option<u32>) -> Result<Vec<Post>> {
        let request = FeedRequest::new(
            viewer.user_id,
            page.unwrap_or(0),
            size.unwrap_or(self.default_page_size),
            self.max_page_size,
        )?;

        let timer = FEED_ASSEMBLY_SECONDS.start_timer();
        let assembled = self.assemble(&request).await;
        timer.observe_duration();

        match assembled {
            Ok(feed) => {
                FEED_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
                info!(
                    user_id = %request.viewer,
                    page = request.page,
                    size = request.size,
                    returned = feed.len(),
                    "feed served"
                );
                Ok(feed)
            }
            Err(e) => match self.policy.resolve::<Post>(Err(e)) {
                Ok(empty) => {
                    FEED_REQUESTS_TOTAL.with_label_values(&["fail_open"]).inc();
                    Ok(empty)
                }
                Err(e) => {
                    FEED_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                    error!(user_id = %request.viewer, error = %e, "feed assembly failed");
                    Err(e.into())
                }
            },
        }
    }

    async fn assemble(&self, request: &FeedRequest) -> std::result::Result<Vec<Post>, RankingError> {
        let likes = self
            .store
            .likes_by_user(request.viewer)
            .await
            .map_err(RankingError::computation)?;
        let affinity = category_affinity(&likes);

        let candidates = self
            .store
            .posts_page(request.viewer, request.offset(), request.limit())
            .await
            .map_err(RankingError::computation)?;
        FEED_CANDIDATES.observe(candidates.len() as f64);

        let ids: Vec<Uuid> = candidates.iter().map(|p| p.id()).collect();
        let counts = self
            .store
            .like_counts(&ids)
            .await
            .map_err(RankingError::computation)?;

        Ok(self.assembler.assemble(&affinity, candidates, &counts))
    }

    /// Users who comment most on `username`'s posts.
    pub async fn close_friends(&self, username: &str) -> Result<Vec<FriendScore>> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::BadRequest("username must not be blank".into()));
        }

        let posts = self.store.posts_by_author_name(username).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        // Display names are not unique; every account under this name counts as the owner
        let mut owners: Vec<Uuid> = posts.iter().filter_map(|p| p.user_id).collect();
        owners.sort_unstable();
        owners.dedup();

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id()).collect();
        let comments = self.store.comments_for_posts(&ids).await?;

        Ok(infer_close_friends(&owners, &posts, &comments)?)
    }
}
