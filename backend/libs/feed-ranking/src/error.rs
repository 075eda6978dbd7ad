use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankingError>;

/// Failures raised by the ranking pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RankingError {
    /// A referenced post or user does not exist in the fact store
    #[error("not found: {0}")]
    NotFound(String),

    /// A blank or nil identifier was handed to a ranking call
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Fetching or ordering the feed snapshot failed
    #[error("feed computation failed: {0}")]
    ComputationFailure(String),
}

impl RankingError {
    pub fn computation(err: impl std::fmt::Display) -> Self {
        RankingError::ComputationFailure(err.to_string())
    }
}
