//! Service layer
//!
//! - `fact_store`: read-only access to the facts the ranking pass consumes
//! - `ranking`: feed, category affinity and close-friends endpoints' logic

pub mod fact_store;
pub mod ranking;

pub use fact_store::{FactStore, PgFactStore};
pub use ranking::RankingService;
