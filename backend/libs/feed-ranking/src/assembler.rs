//! Feed assembly
//!
//! Candidates are one page of posts in storage order. Pagination happens
//! before ranking, so page N of the feed is "page N of storage, ranked",
//! not the Nth slice of a globally ranked list.
//!
//! Output order:
//! 1. For each preferred category in affinity order, the candidates in
//!    that category (ordered by [`PreferredOrder`])
//! 2. Every remaining candidate, by popularity
//!
//! Each candidate id is emitted exactly once.

use crate::affinity::CategoryAffinity;
use crate::error::{RankingError, Result};
use crate::model::{normalize_category, FeedItem, LikeCounts};
use crate::popularity::{popularity_cmp, recency_cmp};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use tracing::{debug, warn};
use uuid::Uuid;

/// A feed page request for one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub viewer: Uuid,
    pub page: u32,
    pub size: u32,
}

impl FeedRequest {
    /// Builds a request, clamping `size` into `1..=max_size`.
    pub fn new(viewer: Uuid, page: u32, size: u32, max_size: u32) -> Result<Self> {
        if viewer.is_nil() {
            return Err(RankingError::InvalidInput("viewer id must not be nil".into()));
        }

        Ok(Self {
            viewer,
            page,
            size: size.clamp(1, max_size.max(1)),
        })
    }

    /// Row offset of the first candidate in storage order.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

/// Ordering used inside a preferred category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreferredOrder {
    /// Newest first; like count only breaks timestamp ties
    #[default]
    Recency,
    /// Same ordering as the remainder: likes, then recency
    Popularity,
}

impl FromStr for PreferredOrder {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recency" => Ok(PreferredOrder::Recency),
            "popularity" => Ok(PreferredOrder::Popularity),
            other => Err(RankingError::InvalidInput(format!(
                "unknown preferred order '{}'",
                other
            ))),
        }
    }
}

/// What to do when building a feed fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedFailurePolicy {
    /// Log and serve an empty feed
    #[default]
    FailOpen,
    /// Return the error to the caller
    Surface,
}

impl FeedFailurePolicy {
    pub fn from_fail_open(fail_open: bool) -> Self {
        if fail_open {
            FeedFailurePolicy::FailOpen
        } else {
            FeedFailurePolicy::Surface
        }
    }

    /// Applies the policy to an assembly result.
    ///
    /// Only `ComputationFailure` is swallowed; invalid input and missing
    /// entities always reach the caller.
    pub fn resolve<T>(self, result: Result<Vec<T>>) -> Result<Vec<T>> {
        match (self, result) {
            (_, Ok(items)) => Ok(items),
            (FeedFailurePolicy::FailOpen, Err(RankingError::ComputationFailure(reason))) => {
                warn!(%reason, "feed assembly failed, serving empty feed");
                Ok(Vec::new())
            }
            (_, Err(e)) => Err(e),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedAssembler {
    preferred_order: PreferredOrder,
}

impl FeedAssembler {
    pub fn new(preferred_order: PreferredOrder) -> Self {
        Self { preferred_order }
    }

    /// Orders `candidates` for a viewer with the given category affinity.
    pub fn assemble<P, C>(&self, affinity: &[CategoryAffinity], candidates: Vec<P>, counts: &C) -> Vec<P>
    where
        P: FeedItem,
        C: LikeCounts + ?Sized,
    {
        let total = candidates.len();
        let mut seen: HashSet<Uuid> = HashSet::with_capacity(total);
        let mut by_category: HashMap<String, Vec<P>> = HashMap::new();

        for post in candidates {
            if !seen.insert(post.id()) {
                debug!(post_id = %post.id(), "duplicate candidate dropped");
                continue;
            }
            by_category
                .entry(normalize_category(post.category()).to_string())
                .or_default()
                .push(post);
        }

        let mut feed: Vec<P> = Vec::with_capacity(seen.len());

        for preferred in affinity {
            let Some(mut bucket) = by_category.remove(preferred.category.trim()) else {
                continue;
            };
            match self.preferred_order {
                PreferredOrder::Recency => bucket.sort_by(|a, b| recency_cmp(a, b, counts)),
                PreferredOrder::Popularity => bucket.sort_by(|a, b| popularity_cmp(a, b, counts)),
            }
            feed.extend(bucket);
        }

        let preferred_count = feed.len();
        let mut remainder: Vec<P> = by_category.into_values().flatten().collect();
        remainder.sort_by(|a, b| popularity_cmp(a, b, counts));
        feed.extend(remainder);

        debug!(
            candidates = total,
            preferred = preferred_count,
            emitted = feed.len(),
            "feed assembled"
        );

        feed
    }
}
