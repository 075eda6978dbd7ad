//! # Actix Middleware Library
//!
//! Shared request plumbing for cookBook Actix services
//!
//! ## Modules
//! - `jwt_auth`: session token verification and the `Principal` extractor
//! - `correlation_id`: `x-correlation-id` propagation
//! - `metrics`: Prometheus HTTP metrics middleware

pub mod correlation_id;
pub mod jwt_auth;
pub mod metrics;

pub use correlation_id::{CorrelationId, CorrelationIdMiddleware};
pub use jwt_auth::{bearer_token, AuthError, Principal, SessionClaims, SessionVerifier};
pub use metrics::MetricsMiddleware;
