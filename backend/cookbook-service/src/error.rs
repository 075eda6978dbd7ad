/// Error types for cookBook Service
///
/// Errors are converted to JSON HTTP responses of the form
/// `{"error": <message>, "status": <code>}`.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use feed_ranking::RankingError;
use std::fmt;

/// Result type for cookbook-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Database operation failed
    DatabaseError(String),

    /// Validation failed
    ValidationError(String),

    /// Resource not found
    NotFound(String),

    /// Unauthorized access
    Unauthorized(String),

    /// Caller is authenticated but does not own the resource
    Forbidden(String),

    /// Bad request
    BadRequest(String),

    /// Conflict (duplicate resource, etc.)
    Conflict(String),

    /// Feed assembly failed and the failure policy surfaces it
    FeedUnavailable(String),

    /// Internal server error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::FeedUnavailable(msg) => write!(f, "Feed unavailable: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::FeedUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Database details stay in the logs
        let error_msg = match self {
            AppError::DatabaseError(msg) => {
                tracing::error!("database error: {}", msg);
                "Database error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            other => AppError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<RankingError> for AppError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::NotFound(msg) => AppError::NotFound(msg),
            RankingError::InvalidInput(msg) => AppError::BadRequest(msg),
            RankingError::ComputationFailure(msg) => AppError::FeedUnavailable(msg),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::FeedUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::ValidationError("x".into()).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_ranking_error_mapping() {
        assert!(matches!(
            AppError::from(RankingError::InvalidInput("blank".into())),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from(RankingError::NotFound("user".into())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(RankingError::ComputationFailure("db".into())),
            AppError::FeedUnavailable(_)
        ));
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        assert!(matches!(AppError::from(sqlx::Error::RowNotFound), AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let resp = AppError::NotFound("post".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 404);
        assert_eq!(json["error"], "Not found: post");
    }

    #[actix_web::test]
    async fn test_database_details_hidden() {
        let resp = AppError::DatabaseError("password authentication failed".into()).error_response();

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Database error");
    }
}
