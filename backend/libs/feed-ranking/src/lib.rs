//! # Feed Ranking
//!
//! Storage-agnostic ranking pass used for personalised post feeds and
//! "close friends" inference.
//!
//! ## Modules
//! - `affinity`: per-user category preferences from like history
//! - `popularity`: total order on posts by like count and recency
//! - `assembler`: merges affinity and popularity into the final feed
//! - `close_friends`: ranks commenters on a user's own posts
//!
//! Every operation is a pure, synchronous function over already-fetched
//! collections. Callers fetch a snapshot per request and hand it in.

pub mod affinity;
pub mod assembler;
pub mod close_friends;
pub mod error;
pub mod model;
pub mod popularity;

pub use affinity::{category_affinity, CategoryAffinity};
pub use assembler::{FeedAssembler, FeedFailurePolicy, FeedRequest, PreferredOrder};
pub use close_friends::{infer_close_friends, FriendScore};
pub use error::{RankingError, Result};
pub use model::{normalize_category, CommentFact, FeedItem, LikeCounts, LikeFact, DEFAULT_CATEGORY};
pub use popularity::popularity_cmp;
