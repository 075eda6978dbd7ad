//! cookBook Service Library
//!
//! Recipe-sharing backend: posts, likes, comments, learning plans, follows,
//! group chat, and a personalised feed built by the `feed-ranking` crate.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod realtime;
pub mod repository;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
